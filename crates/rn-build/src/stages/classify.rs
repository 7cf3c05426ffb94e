//! Node classification by undirected degree and the signal tag.

use rn_map::{Network, NodeKind};

/// Classify every node and rebuild the membership lists.
///
/// Degree 1 → `End`; degree 2 → left as is (interior shape point, or an
/// already-promoted connector); degree ≥3 → `Signalized` when tagged
/// `highway=traffic_signals`, else `Unsignalized`.  Re-running the pass on
/// an unchanged network reproduces the same classification.
pub(crate) fn classify_nodes(network: &mut Network) {
    network.signalized_nodes.clear();
    network.unsignalized_nodes.clear();
    network.end_nodes.clear();

    let mut signalized = Vec::new();
    let mut unsignalized = Vec::new();
    let mut ends = Vec::new();

    for (id, node) in &mut network.nodes {
        match node.undirected_degree() {
            1 => {
                node.kind = NodeKind::End;
                ends.push(id.clone());
            }
            2 => {}
            _ => {
                if node.has_signal_tag() {
                    node.kind = NodeKind::Signalized;
                    signalized.push(id.clone());
                } else {
                    node.kind = NodeKind::Unsignalized;
                    unsignalized.push(id.clone());
                }
            }
        }
    }

    network.signalized_nodes = signalized;
    network.unsignalized_nodes = unsignalized;
    network.end_nodes = ends;
}
