//! Lane groups within a segment sharing one turning-direction combination.

use rn_core::{Polyline, ShiftSide, Turn};

use crate::ids::{LaneSetId, LinkId, MovementId, NodeId, SegmentId};
use crate::link::effective_speed;
use crate::segment::{Segment, LANE_DISPLAY_INTERVAL_M};

/// A contiguous lane group within one segment.
///
/// The in-segment offset picks the geometry shift: 0 keeps the centerline,
/// +1 (left turns) shifts left, −1 (right turns) shifts right.
#[derive(Clone, Debug)]
pub struct LaneSet {
    pub id: LaneSetId,
    pub segment: SegmentId,
    pub link: Option<LinkId>,

    pub length_m: f64,
    pub speed_limit_mps: f64,
    pub lane_count: u32,

    /// Turn letters served, e.g. `"l"`, `"sr"`; empty off intersections.
    pub turns: String,
    pub movements: Vec<MovementId>,

    pub offset: i32,
    pub geometry: Polyline,

    pub upstream_node: NodeId,
    pub downstream_node: NodeId,

    pub upstream_lanesets: Vec<LaneSetId>,
    pub downstream_lanesets: Vec<LaneSetId>,
}

impl LaneSet {
    /// Build the laneset at `offset` within `segment` serving the given
    /// turn/movement pairs.  A turn may arrive without a movement (the
    /// assignment promised a reserved lane the link never realized); the
    /// turn letter is still recorded so lane counts stay consistent.
    pub fn from_segment(
        segment: &Segment,
        served: &[(Turn, Option<MovementId>)],
        lane_count: u32,
        offset: i32,
    ) -> Self {
        let geometry = match offset.cmp(&0) {
            std::cmp::Ordering::Greater => segment
                .geometry
                .shifted(ShiftSide::Left, LANE_DISPLAY_INTERVAL_M),
            std::cmp::Ordering::Equal => segment.geometry.clone(),
            std::cmp::Ordering::Less => segment
                .geometry
                .shifted(ShiftSide::Right, LANE_DISPLAY_INTERVAL_M),
        };

        LaneSet {
            id: LaneSetId::new(format!("{}_{offset}", segment.id)),
            segment: segment.id.clone(),
            link: segment.link.clone(),
            length_m: segment.length_m,
            speed_limit_mps: segment.speed_limit_mps,
            lane_count,
            turns: served.iter().map(|(t, _)| t.as_char()).collect(),
            movements: served.iter().filter_map(|(_, m)| m.clone()).collect(),
            offset,
            geometry,
            upstream_node: segment.upstream_node.clone(),
            downstream_node: segment.downstream_node.clone(),
            upstream_lanesets: Vec::new(),
            downstream_lanesets: Vec::new(),
        }
    }

    /// True when this laneset serves the given turn.
    pub fn serves(&self, turn: Turn) -> bool {
        self.turns.contains(turn.as_char())
    }

    pub fn free_flow_time_s(&self) -> f64 {
        self.length_m / effective_speed(self.speed_limit_mps)
    }
}
