//! LaneSet generation from lane assignments, and laneset wiring.

use std::collections::BTreeMap;

use rn_core::Turn;
use rn_map::{LaneSet, LaneSetId, MovementId, Network, NodeId, NodeKind, SegmentId};

use crate::diagnostics::Diagnostics;

/// One planned laneset: served turns, lane count, in-segment offset.
struct PlannedLaneSet {
    served: Vec<(Turn, Option<MovementId>)>,
    lane_count: u32,
    offset: i32,
}

/// Slice every segment into lanesets.
///
/// Off intersections a segment is one all-lane laneset.  At intersections
/// the explicit assignment string decides: `left`/`right` tokens reserve
/// dedicated lanes, the rest go through together; a `"null"` assignment
/// falls back to a heuristic over the recorded downstream turns.  A
/// reserved lane whose movement never materialized still gets its laneset
/// (with an error), so per-segment lane counts always add up.
pub(crate) fn generate_lanesets(network: &mut Network, diag: &mut Diagnostics) {
    let segment_ids: Vec<SegmentId> = network.segments.keys().cloned().collect();
    for segment_id in segment_ids {
        let Some(segment) = network.segments.get(&segment_id) else {
            continue;
        };
        let at_intersection = network
            .nodes
            .get(&segment.downstream_node)
            .is_some_and(|n| n.is_intersection());
        let segment = segment.clone();

        if !at_intersection {
            let laneset = LaneSet::from_segment(&segment, &[], segment.lane_count, 0);
            register(network, &segment_id, laneset);
            continue;
        }

        let mut movement_by_turn: BTreeMap<Turn, MovementId> = BTreeMap::new();
        match &segment.link {
            Some(link_id) => {
                let movement_ids = network
                    .links
                    .get(link_id)
                    .map(|l| l.movements.clone())
                    .unwrap_or_default();
                for movement_id in movement_ids {
                    if let Some(movement) = network.movements.get(&movement_id) {
                        movement_by_turn.insert(movement.turn, movement_id);
                    }
                }
            }
            None => diag.error(format!(
                "segment {segment_id} reaches an intersection but belongs to no link"
            )),
        }

        let plans = plan_lanesets(&segment_id, &segment, &mut movement_by_turn, diag);
        for plan in plans {
            let laneset =
                LaneSet::from_segment(&segment, &plan.served, plan.lane_count, plan.offset);
            register(network, &segment_id, laneset);
        }
    }

    let laneset_ids: Vec<LaneSetId> = network.lanesets.keys().cloned().collect();
    for laneset_id in laneset_ids {
        let Some(laneset) = network.lanesets.get(&laneset_id) else {
            continue;
        };
        let upstream = laneset.upstream_node.clone();
        let downstream = laneset.downstream_node.clone();
        if let Some(node) = network.nodes.get_mut(&upstream) {
            node.downstream_lanesets.push(laneset_id.clone());
        }
        if let Some(node) = network.nodes.get_mut(&downstream) {
            node.upstream_lanesets.push(laneset_id);
        }
    }
}

/// Decide the laneset layout of one intersection-bound segment.
fn plan_lanesets(
    segment_id: &SegmentId,
    segment: &rn_map::Segment,
    movement_by_turn: &mut BTreeMap<Turn, MovementId>,
    diag: &mut Diagnostics,
) -> Vec<PlannedLaneSet> {
    let total = segment.lane_count;
    let downstream_turns: Vec<Turn> = segment.downstream_turns.keys().copied().collect();
    let assignment = segment.lane_assignment.as_deref().unwrap_or("null");

    let all_served = |movement_by_turn: &BTreeMap<Turn, MovementId>, turns: &[Turn]| {
        turns
            .iter()
            .map(|&t| (t, movement_by_turn.get(&t).cloned()))
            .collect::<Vec<_>>()
    };

    match assignment {
        "null" => {
            if total == 0 {
                diag.warn(format!("segment {segment_id} lane number equals 0"));
                return Vec::new();
            }
            if total == 1 {
                return vec![PlannedLaneSet {
                    served: all_served(movement_by_turn, &downstream_turns),
                    lane_count: 1,
                    offset: 0,
                }];
            }
            let mut plans = Vec::new();
            if downstream_turns.contains(&Turn::Through) {
                let mut remaining = total;
                if downstream_turns.contains(&Turn::Left) {
                    plans.push(PlannedLaneSet {
                        served: all_served(movement_by_turn, &[Turn::Left]),
                        lane_count: 1,
                        offset: 1,
                    });
                    remaining -= 1;
                }
                if downstream_turns.contains(&Turn::Right) {
                    if remaining > 2 {
                        plans.push(PlannedLaneSet {
                            served: all_served(movement_by_turn, &[Turn::Right]),
                            lane_count: 1,
                            offset: -1,
                        });
                        plans.push(PlannedLaneSet {
                            served: all_served(movement_by_turn, &[Turn::Through]),
                            lane_count: remaining - 1,
                            offset: 0,
                        });
                    } else {
                        plans.push(PlannedLaneSet {
                            served: all_served(movement_by_turn, &[Turn::Right, Turn::Through]),
                            lane_count: remaining,
                            offset: 0,
                        });
                    }
                } else {
                    plans.push(PlannedLaneSet {
                        served: all_served(movement_by_turn, &[Turn::Through]),
                        lane_count: remaining,
                        offset: 0,
                    });
                }
            } else if downstream_turns.len() == 1 {
                plans.push(PlannedLaneSet {
                    served: all_served(movement_by_turn, &downstream_turns),
                    lane_count: total,
                    offset: 0,
                });
            } else {
                let left_lanes = total.div_ceil(2);
                plans.push(PlannedLaneSet {
                    served: all_served(movement_by_turn, &[Turn::Left]),
                    lane_count: left_lanes,
                    offset: 1,
                });
                plans.push(PlannedLaneSet {
                    served: all_served(movement_by_turn, &[Turn::Right]),
                    lane_count: total - left_lanes,
                    offset: 0,
                });
            }
            plans
        }
        "|" => vec![PlannedLaneSet {
            served: all_served(movement_by_turn, &downstream_turns),
            lane_count: total,
            offset: 0,
        }],
        explicit => {
            let left = explicit.split('|').filter(|token| *token == "left").count() as i64;
            let right = explicit.split('|').filter(|token| *token == "right").count() as i64;
            let through = total as i64 - left - right;

            if through == total as i64 {
                let turns: Vec<Turn> = movement_by_turn.keys().copied().collect();
                return vec![PlannedLaneSet {
                    served: all_served(movement_by_turn, &turns),
                    lane_count: total,
                    offset: 0,
                }];
            }

            let mut plans = Vec::new();
            if left > 0 {
                let movement = movement_by_turn.remove(&Turn::Left);
                if movement.is_none() {
                    diag.error(format!(
                        "left movement missing for dedicated lane of segment {segment_id}"
                    ));
                }
                plans.push(PlannedLaneSet {
                    served: vec![(Turn::Left, movement)],
                    lane_count: left as u32,
                    offset: 1,
                });
            }
            if right > 0 {
                let movement = movement_by_turn.remove(&Turn::Right);
                if movement.is_none() {
                    diag.error(format!(
                        "right movement missing for dedicated lane of segment {segment_id}"
                    ));
                }
                plans.push(PlannedLaneSet {
                    served: vec![(Turn::Right, movement)],
                    lane_count: right as u32,
                    offset: -1,
                });
            }
            if through > 0 {
                let served: Vec<(Turn, Option<MovementId>)> = movement_by_turn
                    .iter()
                    .map(|(&turn, id)| (turn, Some(id.clone())))
                    .collect();
                plans.push(PlannedLaneSet {
                    served,
                    lane_count: through as u32,
                    offset: 0,
                });
            }
            plans
        }
    }
}

fn register(network: &mut Network, segment_id: &SegmentId, laneset: LaneSet) {
    let id = laneset.id.clone();
    if let Some(segment) = network.segments.get_mut(segment_id) {
        segment.lanesets.push(id);
    }
    network.add_laneset(laneset);
}

/// Wire lanesets across nodes.
///
/// At intersections each laneset follows its turn letters into the matching
/// downstream segments, but only when the target segment has exactly one
/// laneset (a multi-laneset target is ambiguous at this granularity).
/// Connector nodes wire every upstream laneset to every downstream one.
pub(crate) fn connect_lanesets(network: &mut Network, diag: &mut Diagnostics) {
    let node_ids: Vec<NodeId> = network.nodes.keys().cloned().collect();
    for node_id in node_ids {
        let Some(node) = network.nodes.get(&node_id) else {
            continue;
        };
        let kind = node.kind;
        let ups = node.upstream_segments.clone();
        let downs = node.downstream_segments.clone();

        if matches!(kind, NodeKind::Signalized | NodeKind::Unsignalized) {
            for up_id in &ups {
                let Some(segment) = network.segments.get(up_id) else {
                    continue;
                };
                let turn_map = segment.downstream_turns.clone();
                let laneset_ids = segment.lanesets.clone();

                for laneset_id in laneset_ids {
                    let turns: Vec<Turn> = network
                        .lanesets
                        .get(&laneset_id)
                        .map(|ls| ls.turns.chars().filter_map(Turn::from_char).collect())
                        .unwrap_or_default();

                    let mut targets: Vec<SegmentId> = Vec::new();
                    for turn in turns {
                        if turn == Turn::UTurn {
                            continue;
                        }
                        match turn_map.get(&turn) {
                            Some(down_segment) => targets.push(down_segment.clone()),
                            None => diag.warn(format!(
                                "segment {up_id} records no downstream {turn} for laneset {laneset_id}"
                            )),
                        }
                    }
                    for down_segment_id in targets {
                        let down_lanesets = network
                            .segments
                            .get(&down_segment_id)
                            .map(|s| s.lanesets.clone())
                            .unwrap_or_default();
                        if down_lanesets.len() != 1 {
                            continue;
                        }
                        wire(network, &laneset_id, &down_lanesets[0]);
                    }
                }
            }
        } else if kind == NodeKind::Connector {
            for up_id in &ups {
                let up_lanesets = network
                    .segments
                    .get(up_id)
                    .map(|s| s.lanesets.clone())
                    .unwrap_or_default();
                for down_id in &downs {
                    let down_lanesets = network
                        .segments
                        .get(down_id)
                        .map(|s| s.lanesets.clone())
                        .unwrap_or_default();
                    for up_laneset in &up_lanesets {
                        for down_laneset in &down_lanesets {
                            wire(network, up_laneset, down_laneset);
                        }
                    }
                }
            }
        }
    }
}

fn wire(network: &mut Network, upstream: &LaneSetId, downstream: &LaneSetId) {
    if let Some(laneset) = network.lanesets.get_mut(upstream) {
        laneset.downstream_lanesets.push(downstream.clone());
    }
    if let Some(laneset) = network.lanesets.get_mut(downstream) {
        laneset.upstream_lanesets.push(upstream.clone());
    }
}
