//! Links: maximal same-direction segment chains between significant nodes.

use rn_core::{CompassDirection, Polyline};

use crate::ids::{ArterialId, LaneSetId, LinkId, MovementId, NodeId, SegmentId};

/// Free-flow speed substituted for segments with a non-positive limit when
/// aggregating link travel time.
pub const FALLBACK_FREE_FLOW_MPS: f64 = 12.0;

/// Speed usable as a divisor: the recorded limit, or the fallback.
#[inline]
pub fn effective_speed(speed_limit_mps: f64) -> f64 {
    if speed_limit_mps > 0.0 {
        speed_limit_mps
    } else {
        FALLBACK_FREE_FLOW_MPS
    }
}

/// A chain of same-direction segments joining two significant nodes.
///
/// Aggregate speed is total length over total free-flow time, so longer and
/// faster constituents weigh more than in a plain mean.
#[derive(Clone, Debug, Default)]
pub struct Link {
    pub id: LinkId,
    pub segments: Vec<SegmentId>,
    pub geometry: Polyline,
    pub nodes: Vec<NodeId>,
    pub movements: Vec<MovementId>,

    pub upstream_node: NodeId,
    pub downstream_node: NodeId,

    /// Unweighted mean of constituent segment headings.
    pub heading: f64,
    pub from_direction: CompassDirection,

    pub speed_limit_mps: f64,
    pub length_m: f64,

    /// Length of the downstream portion carrying dedicated turn lanesets.
    pub dedicated_turn_length_m: f64,
    pub entry_laneset: Option<LaneSetId>,

    pub arterials: Vec<ArterialId>,
}

impl Link {
    pub fn add_movement(&mut self, movement: MovementId) {
        self.movements.push(movement);
    }
}
