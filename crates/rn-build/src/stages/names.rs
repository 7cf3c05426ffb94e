//! Intersection naming: the optional name file, then inference from way
//! names.

use rn_map::{Network, NodeId};

/// Apply a `node_id,name` listing (header line skipped).  Only the last
/// `:`-separated component of the name is kept.
pub(crate) fn load_intersection_names(network: &mut Network, listing: &str) {
    for line in listing.lines().skip(1) {
        let Some((node_id, name)) = line.split_once(',') else {
            continue;
        };
        if let Some(node) = network.nodes.get_mut(&NodeId::from(node_id.trim())) {
            let short = name.trim().split(':').next_back().unwrap_or_default();
            node.name = Some(short.to_string());
        }
    }
}

/// Name the remaining unnamed intersections `vertical/horizontal` from
/// their movements' upstream way names.
///
/// Phase indices 1, 2, 5, 6 approach on the vertical street and 3, 4, 7, 8
/// on the horizontal one; the first named approach on each axis wins, with
/// `null` standing in for an axis that never produces a name.
pub(crate) fn infer_intersection_names(network: &mut Network) {
    let node_ids: Vec<NodeId> = network.nodes.keys().cloned().collect();
    for node_id in node_ids {
        let Some(node) = network.nodes.get(&node_id) else {
            continue;
        };
        if !node.is_intersection() || node.name.is_some() {
            continue;
        }
        let movements = node.movements.clone();

        let mut vertical: Option<String> = None;
        let mut horizontal: Option<String> = None;
        for movement_id in movements {
            let Some(movement) = network.movements.get(&movement_id) else {
                continue;
            };
            let road_name = network
                .links
                .get(&movement.upstream_link)
                .and_then(|l| l.segments.last())
                .and_then(|id| network.segments.get(id))
                .and_then(|s| s.tags.get("name").cloned());
            match movement.index {
                Some(1 | 2 | 5 | 6) if vertical.is_none() => vertical = road_name,
                Some(3 | 4 | 7 | 8) if horizontal.is_none() => horizontal = road_name,
                _ => {}
            }
        }

        if let Some(node) = network.nodes.get_mut(&node_id) {
            node.name = Some(format!(
                "{}/{}",
                vertical.as_deref().unwrap_or("null"),
                horizontal.as_deref().unwrap_or("null")
            ));
        }
    }
}
