//! Movement generation at intersections, laneset refinement, and surveyed
//! stop-bar/clearance points.

use rn_core::{movement_index, GeoPoint, Polyline};
use rn_map::{LaneSetId, Movement, MovementId, Network, NodeId};

use crate::diagnostics::Diagnostics;

/// Create one movement per recorded turn of every intersection approach.
///
/// Both end segments must already belong to links; a missing link skips the
/// pair.  The id is the upstream link id joined with the downstream link's
/// end-node part, the phase index comes from the standard table, and the
/// coarse geometry is the two link polylines concatenated.
pub(crate) fn generate_movements(network: &mut Network) {
    let node_ids: Vec<NodeId> = network.nodes.keys().cloned().collect();
    for node_id in node_ids {
        let Some(node) = network.nodes.get(&node_id) else {
            continue;
        };
        if !node.is_intersection() {
            continue;
        }
        for up_id in node.upstream_segments.clone() {
            let Some(up_segment) = network.segments.get(&up_id) else {
                continue;
            };
            let up_from = up_segment.from_direction;
            let up_link_id = up_segment.link.clone();
            let turns = up_segment.downstream_turns.clone();

            for (turn, down_segment_id) in turns {
                let Some(up_link_id) = up_link_id.clone() else {
                    continue;
                };
                let Some(down_link_id) = network
                    .segments
                    .get(&down_segment_id)
                    .and_then(|s| s.link.clone())
                else {
                    continue;
                };

                let end_node = down_link_id.as_str().split('_').next_back().unwrap_or_default();
                let id = MovementId::new(format!("{up_link_id}_{end_node}"));

                let mut movement = Movement::new(
                    id.clone(),
                    up_link_id.clone(),
                    down_link_id.clone(),
                    node_id.clone(),
                    turn,
                );
                movement.index = movement_index(up_from, turn);

                let mut geometry = network
                    .links
                    .get(&up_link_id)
                    .map(|l| l.geometry.clone())
                    .unwrap_or_default();
                if let Some(down_link) = network.links.get(&down_link_id) {
                    geometry.append(&down_link.geometry, false);
                }
                movement.geometry = geometry;

                if let Some(node) = network.nodes.get_mut(&node_id) {
                    node.add_movement(id.clone());
                }
                if let Some(link) = network.links.get_mut(&up_link_id) {
                    link.add_movement(id);
                }
                network.add_movement(movement);
            }
        }
    }
}

/// Refine every movement with the lanesets it runs over.
///
/// Along the upstream link, a single-laneset segment contributes that
/// laneset; a multi-laneset segment contributes the one serving the
/// movement's turn (first laneset as a warned fallback).  The geometry is
/// rebuilt from the chosen laneset polylines plus the downstream link.
pub(crate) fn movement_details(network: &mut Network, diag: &mut Diagnostics) {
    let movement_ids: Vec<MovementId> = network.movements.keys().cloned().collect();
    for movement_id in movement_ids {
        let Some(movement) = network.movements.get(&movement_id) else {
            continue;
        };
        let turn = movement.turn;
        let up_link_id = movement.upstream_link.clone();
        let down_link_id = movement.downstream_link.clone();
        let chain = network
            .links
            .get(&up_link_id)
            .map(|l| l.segments.clone())
            .unwrap_or_default();

        let mut chosen: Vec<LaneSetId> = Vec::with_capacity(chain.len());
        for segment_id in &chain {
            let Some(segment) = network.segments.get(segment_id) else {
                continue;
            };
            match segment.lanesets.as_slice() {
                [] => diag.error(format!("segment {segment_id} has no lanesets")),
                [only] => chosen.push(only.clone()),
                several => {
                    let pick = several.iter().find(|id| {
                        network.lanesets.get(id).is_some_and(|ls| ls.serves(turn))
                    });
                    match pick {
                        Some(laneset) => chosen.push(laneset.clone()),
                        None => {
                            diag.warn(format!(
                                "no laneset of segment {segment_id} serves movement {movement_id}"
                            ));
                            chosen.push(several[0].clone());
                        }
                    }
                }
            }
        }

        let mut geometry = Polyline::default();
        for laneset_id in &chosen {
            if let Some(laneset) = network.lanesets.get(laneset_id) {
                geometry.append(&laneset.geometry, false);
            }
        }
        if let Some(down_link) = network.links.get(&down_link_id) {
            geometry.append(&down_link.geometry, false);
        }

        if let Some(movement) = network.movements.get_mut(&movement_id) {
            movement.lanesets = chosen;
            movement.geometry = geometry;
        }
    }
}

/// Attach surveyed stop-bar and clearance points from way tags.
///
/// The clearance tuple list lives on the first segment of the downstream
/// link under `clearance:{node}`; the stop-bar list on the last segment of
/// the upstream link under `stopbar:{node}_{index}`.  Movements without a
/// phase index cannot match a stop-bar tag.
pub(crate) fn collect_stopbar_clearance(network: &mut Network) {
    let movement_ids: Vec<MovementId> = network.movements.keys().cloned().collect();
    for movement_id in movement_ids {
        let Some(movement) = network.movements.get(&movement_id) else {
            continue;
        };
        let node = movement.node.clone();
        let index = movement.index;
        let up_link_id = movement.upstream_link.clone();
        let down_link_id = movement.downstream_link.clone();

        let clearance = network
            .links
            .get(&down_link_id)
            .and_then(|l| l.segments.first())
            .and_then(|id| network.segments.get(id))
            .and_then(|s| s.tags.get(&format!("clearance:{node}")))
            .map(|raw| parse_point_list(raw));

        let stopbar = index.and_then(|index| {
            network
                .links
                .get(&up_link_id)
                .and_then(|l| l.segments.last())
                .and_then(|id| network.segments.get(id))
                .and_then(|s| s.tags.get(&format!("stopbar:{node}_{index}")))
                .map(|raw| parse_point_list(raw))
        });

        if let Some(movement) = network.movements.get_mut(&movement_id) {
            movement.clearance_points = clearance;
            movement.stopbar_points = stopbar;
        }
    }
}

/// Parse a `"lat,lon|lat,lon"` tag value, skipping malformed tuples.
fn parse_point_list(raw: &str) -> Vec<GeoPoint> {
    raw.split('|')
        .filter_map(|tuple| {
            let (lat, lon) = tuple.split_once(',')?;
            Some(GeoPoint::new(
                lat.trim().parse().ok()?,
                lon.trim().parse().ok()?,
            ))
        })
        .collect()
}
