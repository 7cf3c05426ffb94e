//! Link aggregation: segment chains between significant nodes.

use rn_core::{CompassDirection, Polyline};
use rn_map::{effective_speed, Link, LinkId, Network, NodeId, NodeKind, SegmentId};

use crate::diagnostics::Diagnostics;

/// A connector chain longer than this is assumed cyclic and truncated.
const MAX_CHAIN_HOPS: usize = 20;

/// Walk from every significant node through connector chains and aggregate
/// each chain into a link.
///
/// The walk stops at the next non-connector node or after
/// [`MAX_CHAIN_HOPS`] hops; a connector with other than one downstream
/// segment ends the chain with an error, as does a repeated segment
/// (cycle).  The link id is `"{up}_{down}"`, suffixed `r` when two parallel
/// chains join the same node pair.
pub(crate) fn build_links(network: &mut Network, diag: &mut Diagnostics) {
    let node_ids: Vec<NodeId> = network.nodes.keys().cloned().collect();
    for node_id in node_ids {
        let Some(node) = network.nodes.get(&node_id) else {
            continue;
        };
        if !node.is_significant() {
            continue;
        }
        for start in node.downstream_segments.clone() {
            let mut chain = vec![start.clone()];
            let mut current = start;

            for _ in 0..MAX_CHAIN_HOPS {
                let Some(segment) = network.segments.get(&current) else {
                    break;
                };
                let downstream_kind = network
                    .nodes
                    .get(&segment.downstream_node)
                    .map(|n| n.kind);
                if downstream_kind == Some(NodeKind::Ordinary) {
                    diag.error(format!(
                        "downstream node {} of segment {current} is still ordinary",
                        segment.downstream_node
                    ));
                }
                if downstream_kind != Some(NodeKind::Connector) {
                    break;
                }
                let downs = &segment.downstream_segments;
                if downs.len() != 1 {
                    diag.error(format!(
                        "connector continuation of segment {current} has {} downstream segments",
                        downs.len()
                    ));
                    break;
                }
                current = downs[0].clone();
                chain.push(current.clone());
            }

            let mut seen = chain.clone();
            seen.sort();
            seen.dedup();
            if seen.len() != chain.len() {
                diag.error(format!(
                    "cyclic segment chain in link generation: {}",
                    chain
                        .iter()
                        .map(|id| id.as_str())
                        .collect::<Vec<_>>()
                        .join(",")
                ));
            }

            link_from_chain(network, &chain);
        }
    }
}

/// Aggregate one walked chain into a registered link.
fn link_from_chain(network: &mut Network, chain: &[SegmentId]) {
    let (Some(first), Some(last)) = (
        chain.first().and_then(|id| network.segments.get(id)),
        chain.last().and_then(|id| network.segments.get(id)),
    ) else {
        return;
    };
    let upstream_node = first.upstream_node.clone();
    let downstream_node = last.downstream_node.clone();

    let mut geometry = Polyline::new(first.geometry.first().into_iter().collect());
    let mut nodes = vec![upstream_node.clone()];
    let mut headings = Vec::with_capacity(chain.len());
    let mut total_length = 0.0;
    let mut total_free_flow_time = 0.0;

    for id in chain {
        let Some(segment) = network.segments.get(id) else {
            continue;
        };
        total_length += segment.length_m;
        total_free_flow_time += segment.length_m / effective_speed(segment.speed_limit_mps);
        headings.push(segment.heading);
        nodes.extend(segment.nodes.iter().skip(1).cloned());
        geometry.append(&segment.geometry, true);
    }

    let heading = headings.iter().sum::<f64>() / headings.len().max(1) as f64;
    let speed_limit_mps = if total_free_flow_time > 0.0 {
        total_length / total_free_flow_time
    } else {
        effective_speed(0.0)
    };

    let link = Link {
        id: LinkId::new(format!("{upstream_node}_{downstream_node}")),
        segments: chain.to_vec(),
        geometry,
        nodes,
        upstream_node: upstream_node.clone(),
        downstream_node: downstream_node.clone(),
        heading,
        from_direction: CompassDirection::from_heading(heading),
        speed_limit_mps,
        length_m: total_length,
        ..Link::default()
    };
    let link_id = network.add_link(link, Some("r"));

    for id in chain {
        if let Some(segment) = network.segments.get_mut(id) {
            segment.link = Some(link_id.clone());
        }
    }
    if let Some(node) = network.nodes.get_mut(&upstream_node) {
        node.downstream_links.push(link_id.clone());
    }
    if let Some(node) = network.nodes.get_mut(&downstream_node) {
        node.upstream_links.push(link_id);
    }
}

/// Fill in the laneset-derived link details: the dedicated-turn length and
/// the entry laneset.
pub(crate) fn link_details(network: &mut Network, diag: &mut Diagnostics) {
    let link_ids: Vec<LinkId> = network.links.keys().cloned().collect();
    for link_id in link_ids {
        let Some(link) = network.links.get(&link_id) else {
            continue;
        };
        let chain = link.segments.clone();

        // length of the upstream portion with no dedicated lanesets yet
        let mut length_before_turn = 0.0;
        for id in &chain {
            let Some(segment) = network.segments.get(id) else {
                break;
            };
            if !segment.lanesets.is_empty() {
                break;
            }
            length_before_turn += segment.length_m;
        }

        let entry = chain
            .first()
            .and_then(|id| network.segments.get(id))
            .map(|segment| segment.lanesets.clone())
            .unwrap_or_default();
        if entry.len() > 1 {
            diag.warn(format!(
                "link {link_id} has multiple entry lanesets, picking the first"
            ));
        }
        if entry.is_empty() {
            diag.error(format!("link {link_id} has no entry laneset"));
        }

        if let Some(link) = network.links.get_mut(&link_id) {
            link.dedicated_turn_length_m = link.length_m - length_before_turn;
            link.entry_laneset = entry.into_iter().next();
        }
    }
}
