//! Segment adjacency wiring, and the 2-in/2-out connector split.

use std::collections::BTreeMap;

use rn_core::{moving_direction, Turn};
use rn_map::{Network, NodeId, NodeKind, SegmentId};

use crate::diagnostics::Diagnostics;

/// Wire upstream segments to their downstream segments at every node.
///
/// Connector and end nodes force `all_through` on their upstream segments.
/// A 1-in connector connects straight through; a 2-in/2-out connector pairs
/// segments by the source-way match rule (same first way → crossed pairing,
/// otherwise index-aligned).  At intersections every upstream×downstream
/// pair is connected and the turn letter recorded in `downstream_turns`.
pub(crate) fn connect_segments(network: &mut Network, diag: &mut Diagnostics) {
    let node_ids: Vec<NodeId> = network.nodes.keys().cloned().collect();
    for node_id in node_ids {
        let Some(node) = network.nodes.get(&node_id) else {
            continue;
        };
        let kind = node.kind;
        let ups = node.upstream_segments.clone();
        let downs = node.downstream_segments.clone();

        match kind {
            NodeKind::Ordinary => {}
            NodeKind::End => force_all_through(network, &ups),
            NodeKind::Connector => {
                force_all_through(network, &ups);
                match ups.len() {
                    1 => {
                        let Some(first_down) = downs.first() else {
                            diag.error(format!(
                                "connector node {node_id} has no downstream segment"
                            ));
                            continue;
                        };
                        if downs.len() != 1 {
                            diag.warn(format!(
                                "connector node {node_id} has {} downstream segments",
                                downs.len()
                            ));
                        }
                        if let Some(segment) = network.segments.get_mut(&ups[0]) {
                            segment.downstream_turns =
                                BTreeMap::from([(Turn::Through, first_down.clone())]);
                        }
                        network.add_segment_connection(&ups[0], first_down);
                    }
                    2 => {
                        if downs.len() != 2 {
                            diag.error(format!(
                                "connector node {node_id} has 2 upstream but {} downstream segments",
                                downs.len()
                            ));
                            continue;
                        }
                        // two directions of the same road meet here: when the
                        // first upstream and first downstream come from the
                        // same way they are opposite directions, so the
                        // pairing crosses
                        let crossed = {
                            let first_way = |id: &SegmentId| {
                                network
                                    .segments
                                    .get(id)
                                    .and_then(|s| s.source_ways.first().cloned())
                            };
                            first_way(&ups[0]) == first_way(&downs[0])
                        };
                        if crossed {
                            network.add_segment_connection(&ups[0], &downs[1]);
                            network.add_segment_connection(&ups[1], &downs[0]);
                        } else {
                            log::debug!(
                                "connector node {node_id}: no shared source way, pairing by index"
                            );
                            network.add_segment_connection(&ups[0], &downs[0]);
                            network.add_segment_connection(&ups[1], &downs[1]);
                        }
                    }
                    _ => diag.error(format!(
                        "connector node {node_id} has more than 2 upstream segments"
                    )),
                }
            }
            NodeKind::Signalized | NodeKind::Unsignalized => {
                for up_id in &ups {
                    let Some(up_from) = network.segments.get(up_id).map(|s| s.from_direction)
                    else {
                        continue;
                    };
                    let mut turns: BTreeMap<Turn, SegmentId> = BTreeMap::new();
                    for down_id in &downs {
                        let Some(down_from) =
                            network.segments.get(down_id).map(|s| s.from_direction)
                        else {
                            continue;
                        };
                        if let Some(turn) = moving_direction(up_from, down_from) {
                            turns.insert(turn, down_id.clone());
                        }
                        network.add_segment_connection(up_id, down_id);
                    }
                    if let Some(segment) = network.segments.get_mut(up_id) {
                        segment.downstream_turns = turns;
                    }
                }
            }
        }
    }
}

fn force_all_through(network: &mut Network, segment_ids: &[SegmentId]) {
    for id in segment_ids {
        if let Some(segment) = network.segments.get_mut(id) {
            if segment.lane_assignment.as_deref() != Some("all_through") {
                segment.lane_assignment = Some("all_through".to_string());
            }
        }
    }
}

/// Split every 2-in/2-out connector node into two single-through nodes.
///
/// The two directions of an undirected road otherwise share one node and
/// the link walk could jump between them.  Upstream/downstream segments are
/// paired by equal `from_direction`; each pair gets a clone of the node
/// (id + `"0"`/`"1"`) and the original node is deleted.
pub(crate) fn separate_connector_nodes(network: &mut Network) {
    let node_ids: Vec<NodeId> = network.nodes.keys().cloned().collect();
    for node_id in node_ids {
        let Some(node) = network.nodes.get(&node_id) else {
            continue;
        };
        if node.kind != NodeKind::Connector {
            continue;
        }
        let ups = node.upstream_segments.clone();
        let downs = node.downstream_segments.clone();
        if ups.len() != 2 || downs.len() != 2 {
            continue;
        }
        let template = node.clone();
        let direction_of = |network: &Network, id: &SegmentId| {
            network.segments.get(id).map(|s| s.from_direction)
        };

        let mut flag = 0;
        for up_id in &ups {
            for down_id in &downs {
                let up_from = direction_of(network, up_id);
                if up_from.is_none() || up_from != direction_of(network, down_id) {
                    continue;
                }
                let new_id = NodeId::new(format!("{node_id}{flag}"));
                flag = 1;

                let mut new_node = template.clone();
                new_node.id = new_id.clone();
                new_node.upstream_segments = vec![up_id.clone()];
                new_node.downstream_segments = vec![down_id.clone()];
                network.add_node(new_node);

                if let Some(up) = network.segments.get_mut(up_id) {
                    up.downstream_node = new_id.clone();
                    if let Some(last) = up.nodes.last_mut() {
                        *last = new_id.clone();
                    }
                }
                if let Some(down) = network.segments.get_mut(down_id) {
                    down.upstream_node = new_id.clone();
                    if let Some(first) = down.nodes.first_mut() {
                        *first = new_id.clone();
                    }
                }
            }
        }
        network.nodes.remove(&node_id);
    }
}
