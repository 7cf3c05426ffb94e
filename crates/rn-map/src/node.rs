//! Point nodes and their exclusive category.

use std::collections::BTreeMap;

use rn_core::GeoPoint;

use crate::ids::{LaneSetId, LinkId, MovementId, NodeId, SegmentId, WayId};

// ── NodeKind ──────────────────────────────────────────────────────────────────

/// Exclusive node category, derived from topology and the signal tag.
///
/// `Ordinary` nodes are interior shape points; the segment stage promotes
/// those that end a segment to `Connector`.  `Signalized`/`Unsignalized` are
/// true intersections; `End` nodes terminate exactly one way.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    #[default]
    Ordinary,
    Connector,
    Signalized,
    Unsignalized,
    End,
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A point in the network with back-references to everything incident on it.
///
/// Relationships are ID handle lists into the owning [`Network`]'s arenas,
/// never direct references.
///
/// [`Network`]: crate::Network
#[derive(Clone, Debug, Default)]
pub struct Node {
    pub id: NodeId,
    pub point: GeoPoint,
    pub kind: NodeKind,
    /// Inferred or patched intersection name.
    pub name: Option<String>,
    pub tags: BTreeMap<String, String>,

    /// Ways that originate or terminate here.
    pub od_ways: Vec<WayId>,
    /// Ways that pass through here as an interior node.
    pub traverse_ways: Vec<WayId>,

    pub upstream_segments: Vec<SegmentId>,
    pub downstream_segments: Vec<SegmentId>,
    pub upstream_links: Vec<LinkId>,
    pub downstream_links: Vec<LinkId>,
    pub upstream_lanesets: Vec<LaneSetId>,
    pub downstream_lanesets: Vec<LaneSetId>,
    pub movements: Vec<MovementId>,
}

impl Node {
    pub fn new(id: NodeId, point: GeoPoint, tags: BTreeMap<String, String>) -> Self {
        Self {
            id,
            point,
            tags,
            ..Self::default()
        }
    }

    /// True for signalized and unsignalized intersections.
    pub fn is_intersection(&self) -> bool {
        matches!(self.kind, NodeKind::Signalized | NodeKind::Unsignalized)
    }

    pub fn is_ordinary(&self) -> bool {
        self.kind == NodeKind::Ordinary
    }

    /// Intersection or End node: links begin and end only here.
    pub fn is_significant(&self) -> bool {
        self.is_intersection() || self.kind == NodeKind::End
    }

    /// Undirected degree: a traversing way contributes two incidences, an
    /// originating/terminating way one.
    pub fn undirected_degree(&self) -> usize {
        2 * self.traverse_ways.len() + self.od_ways.len()
    }

    /// True when tagged as a traffic signal.
    pub fn has_signal_tag(&self) -> bool {
        self.tags.get("highway").is_some_and(|v| v == "traffic_signals")
    }

    /// Append a movement back-reference, ignoring duplicates.
    pub fn add_movement(&mut self, movement: MovementId) {
        if !self.movements.contains(&movement) {
            self.movements.push(movement);
        }
    }

    /// Drop one upstream-segment back-reference if present.
    pub fn remove_upstream_segment(&mut self, segment: &SegmentId) {
        self.upstream_segments.retain(|s| s != segment);
    }
}
