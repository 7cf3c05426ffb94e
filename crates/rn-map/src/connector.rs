//! Directed edges between lanesets: ordinary flow and diverges.

use crate::ids::{ConnectorId, LaneSetId, LinkId, MovementId};

/// Connector flavor.  Converge is implicit (two connectors sharing a
/// downstream laneset) and carries no explicit metadata.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectorKind {
    Ordinary,
    Diverge,
}

/// A directed edge from one upstream laneset to one downstream laneset.
#[derive(Clone, Debug)]
pub struct Connector {
    pub id: ConnectorId,
    pub upstream_laneset: LaneSetId,
    pub downstream_laneset: LaneSetId,
    /// Inferred movement identifier; within a single link this degenerates
    /// to the downstream laneset id.
    pub movement: MovementId,
    pub kind: ConnectorKind,

    /// Priority class: 0 > 1 > 2 > ...
    pub priority: u32,
    /// Fraction of upstream flow taking this edge; 1/n across a diverge fan.
    pub diverge_proportion: f64,
}

impl Connector {
    /// Build a connector between two lanesets, inferring the movement id
    /// from the links they belong to.
    pub fn between(
        upstream: &crate::LaneSet,
        downstream: &crate::LaneSet,
        kind: ConnectorKind,
    ) -> Self {
        let movement = infer_movement_id(
            upstream.link.as_ref(),
            downstream.link.as_ref(),
            &downstream.id,
        );
        Connector {
            id: ConnectorId::new(format!("{}_{}", upstream.id, downstream.id)),
            upstream_laneset: upstream.id.clone(),
            downstream_laneset: downstream.id.clone(),
            movement,
            kind,
            priority: 0,
            diverge_proportion: 1.0,
        }
    }
}

/// Movement id of the maneuver this connector crosses:
/// `"{upLink}_{downLinkEndNode}"`, or the downstream laneset id when both
/// lanesets lie on the same link.
fn infer_movement_id(
    upstream_link: Option<&LinkId>,
    downstream_link: Option<&LinkId>,
    downstream_laneset: &LaneSetId,
) -> MovementId {
    match (upstream_link, downstream_link) {
        (Some(up), Some(down)) if up != down => {
            let end_node = down.as_str().split('_').nth(1).unwrap_or_default();
            MovementId::new(format!("{up}_{end_node}"))
        }
        _ => MovementId::new(downstream_laneset.as_str()),
    }
}
