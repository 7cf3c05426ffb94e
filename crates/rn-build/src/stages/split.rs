//! Split ways that pass through an intersection as an interior node.

use std::collections::BTreeMap;

use rn_map::{Network, NodeId, Way, WayId};

use crate::diagnostics::Diagnostics;

/// Cut every way at the intersection nodes it traverses.
///
/// Pieces overlap at the cut node, inherit the parent's tags, and get the
/// parent id plus a sequence number; a colliding id gets `"123"` appended.
/// If a piece id collides even then, the whole split of that one way is
/// abandoned and the parent kept intact — piece ids are resolved up front
/// so no half-split way is ever left behind.  Single-node pieces are
/// dropped with a warning.
pub(crate) fn split_intersection_ways(network: &mut Network, diag: &mut Diagnostics) {
    let mut cuts: BTreeMap<WayId, Vec<usize>> = BTreeMap::new();
    for (way_id, way) in &network.ways {
        for (index, node_id) in way.nodes.iter().enumerate() {
            let Some(node) = network.nodes.get(node_id) else {
                continue;
            };
            if node.is_intersection() && node.traverse_ways.contains(way_id) {
                cuts.entry(way_id.clone()).or_default().push(index);
            }
        }
    }

    'ways: for (way_id, cut_indices) in cuts {
        let Some(parent) = network.ways.get(&way_id) else {
            continue;
        };
        let parent_tags = parent.tags.clone();
        let nodes = parent.nodes.clone();

        // pieces share their cut nodes
        let mut pieces: Vec<Vec<NodeId>> = Vec::new();
        let mut cursor = 0usize;
        for &cut in &cut_indices {
            pieces.push(nodes[cursor..=cut].to_vec());
            cursor = cut;
        }
        pieces.push(nodes[cursor..].to_vec());

        let mut planned: Vec<(WayId, Vec<NodeId>)> = Vec::new();
        for (sequence, piece) in pieces.into_iter().enumerate() {
            if piece.len() <= 1 {
                diag.warn(format!("piece {sequence} of way {way_id} has fewer than two nodes"));
                continue;
            }
            let mut piece_id = WayId::new(format!("{way_id}{sequence}"));
            let taken = |id: &WayId, planned: &[(WayId, Vec<NodeId>)]| {
                network.ways.contains_key(id) || planned.iter().any(|(p, _)| p == id)
            };
            if taken(&piece_id, &planned) {
                diag.warn(format!("way id {piece_id} already exists, appending fallback suffix"));
                piece_id = WayId::new(format!("{piece_id}123"));
                if taken(&piece_id, &planned) {
                    diag.error(format!(
                        "way id {piece_id} still collides, leaving way {way_id} unsplit"
                    ));
                    continue 'ways;
                }
            }
            planned.push((piece_id, piece));
        }

        for (piece_id, piece) in planned {
            let points = piece
                .iter()
                .filter_map(|id| network.nodes.get(id))
                .map(|node| node.point)
                .collect();
            let mut piece_way = Way::from_tags(piece_id, piece, parent_tags.clone());
            piece_way.update_geometry(points);
            network.add_way(piece_way);
        }
        network.ways.remove(&way_id);
    }
}
