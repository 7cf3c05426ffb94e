//! Connector generation from the wired laneset graph.

use rn_map::{Connector, ConnectorKind, LaneSetId, Network};

/// Materialize one connector per laneset→laneset edge.
///
/// A single successor gives an `Ordinary` connector; several give a
/// `Diverge` fan with the flow split evenly across it.  Terminal lanesets
/// produce nothing.  Converges stay implicit: two connectors sharing a
/// downstream laneset.
pub(crate) fn generate_connectors(network: &mut Network) {
    let laneset_ids: Vec<LaneSetId> = network.lanesets.keys().cloned().collect();
    for laneset_id in laneset_ids {
        let Some(laneset) = network.lanesets.get(&laneset_id) else {
            continue;
        };
        let downstream = laneset.downstream_lanesets.clone();
        if downstream.is_empty() {
            continue;
        }

        let kind = if downstream.len() == 1 {
            ConnectorKind::Ordinary
        } else {
            ConnectorKind::Diverge
        };
        let proportion = 1.0 / downstream.len() as f64;

        for down_id in downstream {
            let (Some(up), Some(down)) = (
                network.lanesets.get(&laneset_id),
                network.lanesets.get(&down_id),
            ) else {
                continue;
            };
            let mut connector = Connector::between(up, down, kind);
            if kind == ConnectorKind::Diverge {
                connector.diverge_proportion = proportion;
            }
            network.add_connector(connector);
        }
    }
}
