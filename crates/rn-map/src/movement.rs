//! Turning movements at intersections.

use rn_core::{GeoPoint, Polyline, Turn};

use crate::ids::{LaneSetId, LinkId, MovementId, NodeId};

/// A turning maneuver from one upstream link to one downstream link at an
/// intersection node.
#[derive(Clone, Debug)]
pub struct Movement {
    /// Standard phase index 1..=16; `None` when the direction pair had no
    /// table entry.
    pub index: Option<u8>,
    pub id: MovementId,
    pub upstream_link: LinkId,
    pub downstream_link: LinkId,
    pub node: NodeId,

    pub turn: Turn,
    /// Coarse (link-level) at creation, refined to laneset-level later.
    pub geometry: Polyline,
    pub lanesets: Vec<LaneSetId>,

    /// Surveyed stop-bar points from `stopbar:<node>_<index>` way tags.
    pub stopbar_points: Option<Vec<GeoPoint>>,
    /// Surveyed clearance points from `clearance:<node>` way tags.
    pub clearance_points: Option<Vec<GeoPoint>>,
}

impl Movement {
    pub fn new(
        id: MovementId,
        upstream_link: LinkId,
        downstream_link: LinkId,
        node: NodeId,
        turn: Turn,
    ) -> Self {
        Self {
            index: None,
            id,
            upstream_link,
            downstream_link,
            node,
            turn,
            geometry: Polyline::default(),
            lanesets: Vec::new(),
            stopbar_points: None,
            clearance_points: None,
        }
    }

    /// Re-derive the turn class from the phase index (after a patch changes
    /// the index).
    pub fn refresh_turn(&mut self) {
        if let Some(index) = self.index {
            self.turn = Turn::from_movement_index(index);
        }
    }
}
