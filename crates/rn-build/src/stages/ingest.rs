//! Join loaded ways to node coordinates and prune unusable input.

use rustc_hash::FxHashSet;
use rn_map::{Network, NodeId, WayId};

use crate::diagnostics::Diagnostics;

/// Resolve way node references, record way/node incidence, and drop what
/// the rest of the pipeline cannot use.
///
/// For every way: dangling node references are removed with a warning, a
/// way left with fewer than two nodes is dropped, and surviving ways get
/// their geometry, length, and heading summary computed.  Endpoint nodes
/// record the way in `od_ways`, interior nodes in `traverse_ways` — the
/// classifier derives node degree from those two lists.  Nodes referenced
/// by no way are dropped, then the bounding box is recomputed.
pub(crate) fn link_ways_and_nodes(network: &mut Network, diag: &mut Diagnostics) {
    let way_ids: Vec<WayId> = network.ways.keys().cloned().collect();
    let mut useful: FxHashSet<NodeId> = FxHashSet::default();
    let mut dropped: Vec<WayId> = Vec::new();

    for way_id in way_ids {
        let raw_nodes = network.ways[&way_id].nodes.clone();

        let mut valid: Vec<NodeId> = Vec::with_capacity(raw_nodes.len());
        for node_id in raw_nodes {
            if network.nodes.contains_key(&node_id) {
                valid.push(node_id);
            } else {
                diag.warn(format!("node {node_id} referenced by way {way_id} is not in the map"));
            }
        }

        if valid.len() < 2 {
            diag.warn(format!("way {way_id} has fewer than two nodes, dropped"));
            dropped.push(way_id);
            continue;
        }

        for (position, node_id) in valid.iter().enumerate() {
            useful.insert(node_id.clone());
            if let Some(node) = network.nodes.get_mut(node_id) {
                if position == 0 || position == valid.len() - 1 {
                    node.od_ways.push(way_id.clone());
                } else {
                    node.traverse_ways.push(way_id.clone());
                }
            }
        }

        let points = valid
            .iter()
            .filter_map(|id| network.nodes.get(id))
            .map(|node| node.point)
            .collect();
        if let Some(way) = network.ways.get_mut(&way_id) {
            way.nodes = valid;
            way.update_geometry(points);
        }
    }

    for way_id in dropped {
        network.ways.remove(&way_id);
    }
    network.nodes.retain(|id, _| useful.contains(id));
    network.reset_bounds();
}
