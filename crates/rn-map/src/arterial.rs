//! Arterial aggregates: named link-level corridors in paired directions.

use std::collections::BTreeMap;

use rn_core::{CompassDirection, Polyline};

use crate::error::{MapError, MapResult};
use crate::graph::{EdgeWeight, Granularity};
use crate::ids::{ArterialId, LinkId, MovementId, NodeId};
use crate::network::Network;

// ── Path ──────────────────────────────────────────────────────────────────────

/// An ordered link-level route through the network, with cumulative
/// distances keyed by node, link, and movement.
#[derive(Clone, Debug, Default)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub links: Vec<LinkId>,
    pub movements: Vec<MovementId>,
    pub length_m: f64,
    pub geometry: Polyline,

    pub distance_by_node: BTreeMap<NodeId, f64>,
    pub distance_by_link: BTreeMap<LinkId, f64>,
    pub distance_by_movement: BTreeMap<MovementId, f64>,
}

impl Path {
    /// Chain link-level shortest paths through `stops` in order.
    pub fn through_nodes(network: &Network, stops: &[NodeId]) -> MapResult<Path> {
        if stops.len() < 2 {
            return Err(MapError::TooFewStops(stops.len()));
        }

        let mut nodes: Vec<NodeId> = Vec::new();
        let mut links: Vec<LinkId> = Vec::new();
        let mut length = 0.0;
        for pair in stops.windows(2) {
            let leg = network.shortest_path_between_nodes(
                &pair[0],
                &pair[1],
                Granularity::Link,
                EdgeWeight::Length,
            )?;
            let skip = usize::from(!nodes.is_empty()); // legs share their joint node
            nodes.extend(leg.nodes.into_iter().skip(skip));
            links.extend(leg.edges.into_iter().map(LinkId::new));
            length += leg.weight;
        }

        let movements = movements_along(network, &links);
        let mut path = Path {
            nodes,
            links,
            movements,
            length_m: length,
            ..Path::default()
        };
        path.update_distances(network);
        path.geometry = path.concat_geometry(network);
        Ok(path)
    }

    fn update_distances(&mut self, network: &Network) {
        if let Some(first) = self.nodes.first() {
            self.distance_by_node.insert(first.clone(), 0.0);
        }
        let mut cumulative = 0.0;
        for (idx, link_id) in self.links.iter().enumerate() {
            let Some(link) = network.links.get(link_id) else {
                continue;
            };
            cumulative += link.length_m;
            self.distance_by_link.insert(link_id.clone(), cumulative);
            if let Some(movement) = self.movements.get(idx) {
                self.distance_by_movement.insert(movement.clone(), cumulative);
            }
            if let Some(node) = self.nodes.get(idx + 1) {
                self.distance_by_node.insert(node.clone(), cumulative);
            }
        }
    }

    fn concat_geometry(&self, network: &Network) -> Polyline {
        let mut geometry = Polyline::default();
        for link_id in &self.links {
            if let Some(link) = network.links.get(link_id) {
                geometry.append(&link.geometry, false);
            }
        }
        geometry
    }
}

/// Movement ids crossed between consecutive links, where they exist.
fn movements_along(network: &Network, links: &[LinkId]) -> Vec<MovementId> {
    links
        .windows(2)
        .filter_map(|pair| {
            let end_node = pair[1].as_str().split('_').nth(1)?;
            let id = MovementId::new(format!("{}_{end_node}", pair[0]));
            network.movements.contains_key(&id).then_some(id)
        })
        .collect()
}

// ── Arterial ──────────────────────────────────────────────────────────────────

/// A named corridor: one [`Path`] per travel direction.
#[derive(Clone, Debug)]
pub struct Arterial {
    pub id: ArterialId,
    pub oneways: BTreeMap<CompassDirection, Path>,
}

impl Arterial {
    /// Display name of one direction, e.g. `"plymouth eastbound"`.
    pub fn oneway_name(&self, direction: CompassDirection) -> String {
        let bound = match direction {
            CompassDirection::East => "east",
            CompassDirection::West => "west",
            CompassDirection::South => "south",
            CompassDirection::North => "north",
        };
        format!("{} {bound}bound", self.id)
    }
}

impl Network {
    /// Build and register an arterial from per-direction ordered stop
    /// nodes, recording the back-reference on every member link.
    pub fn build_arterial(
        &mut self,
        id: ArterialId,
        routes: &BTreeMap<CompassDirection, Vec<NodeId>>,
    ) -> MapResult<()> {
        let mut oneways = BTreeMap::new();
        for (direction, stops) in routes {
            oneways.insert(*direction, Path::through_nodes(self, stops)?);
        }

        for path in oneways.values() {
            for link_id in &path.links {
                if let Some(link) = self.links.get_mut(link_id) {
                    if !link.arterials.contains(&id) {
                        link.arterials.push(id.clone());
                    }
                }
            }
        }
        self.add_arterial(Arterial { id, oneways });
        Ok(())
    }
}
