//! Directed segments: one direction of one way.

use std::collections::BTreeMap;

use rn_core::{CompassDirection, Polyline, ShiftSide, Turn};

use crate::ids::{LaneSetId, LinkId, NodeId, SegmentId, WayId};
use crate::way::Way;

/// Lateral spacing used when drawing parallel lane groups, in metres.
pub const LANE_DISPLAY_INTERVAL_M: f64 = 5.0;

/// Segments of undirected ways shift this multiple of the lane interval so
/// the two directions do not visually overlap.
const SEGMENT_SHIFT_RATIO: f64 = 1.8;

// ── SegmentDirection ──────────────────────────────────────────────────────────

/// Which direction of the source way a segment covers.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentDirection {
    #[default]
    Forward,
    Backward,
}

impl SegmentDirection {
    /// Identifier suffix appended to the way id.
    pub fn suffix(self) -> &'static str {
        match self {
            SegmentDirection::Forward => "0",
            SegmentDirection::Backward => "1",
        }
    }
}

// ── Segment ───────────────────────────────────────────────────────────────────

/// A directed, intersection-to-connector atomic road piece.
///
/// Created from exactly one direction of one way; after consolidation a
/// surviving segment may list several `source_ways`.
#[derive(Clone, Debug, Default)]
pub struct Segment {
    pub id: SegmentId,
    /// Originating way first; grows during consolidation.
    pub source_ways: Vec<WayId>,
    pub direction: SegmentDirection,
    /// Way tags with the opposite direction's qualified tags stripped and
    /// this direction's qualifiers flattened (`lanes:backward` → `lanes`).
    pub tags: BTreeMap<String, String>,

    pub link: Option<LinkId>,
    pub lanesets: Vec<LaneSetId>,

    pub speed_limit_mps: f64,
    pub length_m: f64,
    pub geometry: Polyline,
    pub lane_count: u32,
    /// `"all_through"`, `"null"`, or an explicit `turn:lanes` string.
    pub lane_assignment: Option<String>,

    pub heading: f64,
    pub from_direction: CompassDirection,

    pub nodes: Vec<NodeId>,
    pub upstream_node: NodeId,
    pub downstream_node: NodeId,

    pub upstream_segments: Vec<SegmentId>,
    pub downstream_segments: Vec<SegmentId>,
    /// Downstream neighbor per turn letter, filled at intersection wiring.
    pub downstream_turns: BTreeMap<Turn, SegmentId>,
}

impl Segment {
    /// Synthesize the segment covering `direction` of `way`.
    ///
    /// Backward segments reverse geometry and node order.  Both directions
    /// of an undirected way are shifted to their right-hand side so the
    /// pair does not overlap.  Direction-qualified tags are flattened for
    /// the covered direction and dropped for the other.
    pub fn from_way(way: &Way, direction: SegmentDirection) -> Self {
        let id = SegmentId::new(format!("{}{}", way.id, direction.suffix()));

        let (geometry, nodes, lane_count, lane_assignment, heading) = match direction {
            SegmentDirection::Forward => (
                way.geometry.clone(),
                way.nodes.clone(),
                way.forward_lanes,
                way.forward_lane_assignment.clone(),
                way.forward_heading(),
            ),
            SegmentDirection::Backward => (
                way.geometry.reversed(),
                way.nodes.iter().rev().cloned().collect(),
                way.backward_lanes.max(0) as u32,
                way.backward_lane_assignment.clone(),
                way.backward_heading(),
            ),
        };

        let mut tags = flatten_directional_tags(&way.tags, direction);
        tags.insert("oneway".to_string(), "yes".to_string());
        tags.insert("lanes".to_string(), lane_count.to_string());

        let geometry = if way.oneway {
            geometry
        } else {
            geometry.shifted(
                ShiftSide::Right,
                LANE_DISPLAY_INTERVAL_M * SEGMENT_SHIFT_RATIO,
            )
        };

        let from_direction = tags
            .get("direction")
            .and_then(|v| CompassDirection::from_str_opt(v))
            .unwrap_or_else(|| CompassDirection::from_heading(heading));

        let upstream_node = nodes.first().cloned().unwrap_or_default();
        let downstream_node = nodes.last().cloned().unwrap_or_default();

        Segment {
            id,
            source_ways: vec![way.id.clone()],
            direction,
            tags,
            speed_limit_mps: way.speed_limit_mps,
            length_m: way.length_m,
            geometry,
            lane_count,
            lane_assignment,
            heading,
            from_direction,
            nodes,
            upstream_node,
            downstream_node,
            ..Segment::default()
        }
    }

    /// Append a downstream neighbor, ignoring duplicates.
    pub fn add_downstream_segment(&mut self, id: SegmentId) {
        if !self.downstream_segments.contains(&id) {
            self.downstream_segments.push(id);
        }
    }

    /// Append an upstream neighbor, ignoring duplicates.
    pub fn add_upstream_segment(&mut self, id: SegmentId) {
        if !self.upstream_segments.contains(&id) {
            self.upstream_segments.push(id);
        }
    }

    /// Free-flow traversal time in seconds, with the standard fallback
    /// speed for non-positive limits.
    pub fn free_flow_time_s(&self) -> f64 {
        self.length_m / crate::link::effective_speed(self.speed_limit_mps)
    }
}

/// Strip the opposite direction's qualified tags and flatten this
/// direction's (`turn:lanes:backward` → `turn:lanes`).  Tags qualified both
/// ways are dropped as malformed.
fn flatten_directional_tags(
    tags: &BTreeMap<String, String>,
    direction: SegmentDirection,
) -> BTreeMap<String, String> {
    let (keep, drop) = match direction {
        SegmentDirection::Forward => ("forward", "backward"),
        SegmentDirection::Backward => ("backward", "forward"),
    };
    let mut out = BTreeMap::new();
    for (key, value) in tags {
        let has_keep = key.contains(keep);
        let has_drop = key.contains(drop);
        if has_keep && has_drop {
            log::warn!("strange directional tag {key:?}");
            continue;
        }
        if has_drop {
            continue;
        }
        if has_keep {
            let flat = key
                .replace(&format!(":{keep}"), "")
                .replace(&format!("{keep}:"), "");
            out.insert(flat, value.clone());
        } else {
            out.insert(key.clone(), value.clone());
        }
    }
    out
}
