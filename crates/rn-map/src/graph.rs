//! Weighted-digraph query layer: adjacency lists plus Dijkstra.
//!
//! One graph is built per query granularity and cached on the `Network`, so
//! repeated queries pay only the search.  Edge weights for every selector
//! are precomputed at build time; the selector just picks a column.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::error::{MapError, MapResult};
use crate::ids::NodeId;
use crate::link::effective_speed;
use crate::network::Network;

/// Sentinel cost for an unreachable laneset pair; anything at or above this
/// is treated as "no path".
pub const UNREACHABLE_WEIGHT: f64 = 1e8;

// ── Query parameters ──────────────────────────────────────────────────────────

/// Which entity forms the edges of the derived graph.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Granularity {
    /// Edges are segments; vertices are non-ordinary nodes.
    Segment,
    /// Edges are links; vertices are significant nodes.
    Link,
    /// Vertices are lanesets; all departing × arriving pairs are evaluated.
    LaneSet,
}

/// Closed set of numeric edge-weight selectors.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EdgeWeight {
    /// Metres.
    Length,
    /// Seconds at the free-flow speed.
    FreeFlowTime,
}

/// A shortest-path answer: visited nodes, traversed edge identifiers
/// (segment, link, or laneset ids depending on granularity), total weight.
#[derive(Clone, Debug)]
pub struct PathResult {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<String>,
    pub weight: f64,
}

// ── RouteGraph ────────────────────────────────────────────────────────────────

struct EdgeSlot {
    to: u32,
    /// Identifier of the entity this edge represents.
    label: String,
    length: f64,
    free_flow_time: f64,
}

/// Adjacency-list digraph over string vertex keys.
pub(crate) struct RouteGraph {
    keys: Vec<String>,
    index: FxHashMap<String, u32>,
    adjacency: Vec<Vec<EdgeSlot>>,
}

impl RouteGraph {
    fn new() -> Self {
        Self {
            keys: Vec::new(),
            index: FxHashMap::default(),
            adjacency: Vec::new(),
        }
    }

    fn vertex(&mut self, key: &str) -> u32 {
        if let Some(&i) = self.index.get(key) {
            return i;
        }
        let i = self.keys.len() as u32;
        self.keys.push(key.to_string());
        self.index.insert(key.to_string(), i);
        self.adjacency.push(Vec::new());
        i
    }

    fn add_edge(&mut self, from: &str, to: &str, label: String, length: f64, fft: f64) {
        let from = self.vertex(from);
        let to = self.vertex(to);
        self.adjacency[from as usize].push(EdgeSlot {
            to,
            label,
            length,
            free_flow_time: fft,
        });
    }

    pub(crate) fn lookup(&self, key: &str) -> Option<u32> {
        self.index.get(key).copied()
    }

    fn weight_of(&self, edge: &EdgeSlot, selector: EdgeWeight) -> f64 {
        match selector {
            EdgeWeight::Length => edge.length,
            EdgeWeight::FreeFlowTime => edge.free_flow_time,
        }
    }

    /// Dijkstra from `from` to `to`.  Ties break on vertex index, so the
    /// answer is deterministic for a given build order.
    pub(crate) fn dijkstra(
        &self,
        from: u32,
        to: u32,
        selector: EdgeWeight,
    ) -> Option<(f64, Vec<u32>, Vec<String>)> {
        let n = self.keys.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<(u32, usize)>> = vec![None; n]; // (node, edge slot)

        dist[from as usize] = 0.0;
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, u32)>> = BinaryHeap::new();
        heap.push(Reverse((OrderedFloat(0.0), from)));

        while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
            if node == to {
                return Some(self.reconstruct(&prev, from, to, cost));
            }
            if cost > dist[node as usize] {
                continue;
            }
            for (slot, edge) in self.adjacency[node as usize].iter().enumerate() {
                let next = cost + self.weight_of(edge, selector);
                if next < dist[edge.to as usize] {
                    dist[edge.to as usize] = next;
                    prev[edge.to as usize] = Some((node, slot));
                    heap.push(Reverse((OrderedFloat(next), edge.to)));
                }
            }
        }
        None
    }

    fn reconstruct(
        &self,
        prev: &[Option<(u32, usize)>],
        from: u32,
        to: u32,
        total: f64,
    ) -> (f64, Vec<u32>, Vec<String>) {
        let mut nodes = vec![to];
        let mut edges = Vec::new();
        let mut cursor = to;
        while cursor != from {
            // the chain is complete whenever the target was settled
            let Some((node, slot)) = prev[cursor as usize] else {
                break;
            };
            edges.push(self.adjacency[node as usize][slot].label.clone());
            nodes.push(node);
            cursor = node;
        }
        nodes.reverse();
        edges.reverse();
        (total, nodes, edges)
    }

    pub(crate) fn key(&self, index: u32) -> &str {
        &self.keys[index as usize]
    }
}

// ── Graph builders ────────────────────────────────────────────────────────────

pub(crate) fn build_segment_graph(network: &Network) -> RouteGraph {
    let mut graph = RouteGraph::new();
    for (id, node) in &network.nodes {
        if !node.is_ordinary() {
            graph.vertex(id.as_str());
        }
    }
    for (id, segment) in &network.segments {
        graph.add_edge(
            segment.upstream_node.as_str(),
            segment.downstream_node.as_str(),
            id.as_str().to_string(),
            segment.length_m,
            segment.free_flow_time_s(),
        );
    }
    graph
}

pub(crate) fn build_link_graph(network: &Network) -> RouteGraph {
    let mut graph = RouteGraph::new();
    for (id, node) in &network.nodes {
        if node.is_significant() {
            graph.vertex(id.as_str());
        }
    }
    for (id, link) in &network.links {
        graph.add_edge(
            link.upstream_node.as_str(),
            link.downstream_node.as_str(),
            id.as_str().to_string(),
            link.length_m,
            link.length_m / effective_speed(link.speed_limit_mps),
        );
    }
    graph
}

/// Laneset graph vertices are the lanesets themselves; the weight of an
/// edge is the weight of the laneset it leads *into*, so a path's total is
/// the sum over visited lanesets (the source is added by the caller).
pub(crate) fn build_laneset_graph(network: &Network) -> RouteGraph {
    let mut graph = RouteGraph::new();
    for id in network.lanesets.keys() {
        graph.vertex(id.as_str());
    }
    for (id, laneset) in &network.lanesets {
        for downstream in &laneset.downstream_lanesets {
            let Some(target) = network.lanesets.get(downstream) else {
                continue;
            };
            graph.add_edge(
                id.as_str(),
                downstream.as_str(),
                downstream.as_str().to_string(),
                target.length_m,
                target.free_flow_time_s(),
            );
        }
    }
    graph
}

// ── Query entry points ────────────────────────────────────────────────────────

pub(crate) fn shortest_path(
    network: &Network,
    source: &NodeId,
    target: &NodeId,
    granularity: Granularity,
    weight: EdgeWeight,
) -> MapResult<PathResult> {
    debug_assert_ne!(granularity, Granularity::LaneSet);
    let graph = network.graph(granularity);
    let from = graph
        .lookup(source.as_str())
        .ok_or_else(|| MapError::NodeNotFound(source.clone()))?;
    let to = graph
        .lookup(target.as_str())
        .ok_or_else(|| MapError::NodeNotFound(target.clone()))?;

    let (total, node_path, edges) =
        graph
            .dijkstra(from, to, weight)
            .ok_or_else(|| MapError::NoPath {
                from: source.clone(),
                to: target.clone(),
            })?;

    Ok(PathResult {
        nodes: node_path
            .into_iter()
            .map(|i| NodeId::new(graph.key(i)))
            .collect(),
        edges,
        weight: total,
    })
}

/// Laneset-granularity query: evaluate every (departing, arriving) laneset
/// pair and keep the globally cheapest, scoring unreachable pairs with
/// [`UNREACHABLE_WEIGHT`] instead of failing outright.
pub(crate) fn shortest_laneset_path(
    network: &Network,
    source: &NodeId,
    target: &NodeId,
    weight: EdgeWeight,
) -> MapResult<PathResult> {
    let source_node = network
        .nodes
        .get(source)
        .ok_or_else(|| MapError::NodeNotFound(source.clone()))?;
    let target_node = network
        .nodes
        .get(target)
        .ok_or_else(|| MapError::NodeNotFound(target.clone()))?;

    let graph = network.graph(Granularity::LaneSet);
    let mut best: Option<PathResult> = None;

    for departing in &source_node.downstream_lanesets {
        for arriving in &target_node.upstream_lanesets {
            let pair = (graph.lookup(departing.as_str()), graph.lookup(arriving.as_str()));
            let (Some(from), Some(to)) = pair else {
                continue;
            };
            let Some((total, _, mut edges)) = graph.dijkstra(from, to, weight) else {
                // unreachable pair scores the sentinel, never wins
                continue;
            };
            // edge weights cover every laneset but the first
            let entry = &network.lanesets[departing];
            let total = total
                + match weight {
                    EdgeWeight::Length => entry.length_m,
                    EdgeWeight::FreeFlowTime => entry.free_flow_time_s(),
                };
            if total >= UNREACHABLE_WEIGHT - 2.0 {
                continue;
            }
            if best.as_ref().is_none_or(|b| total < b.weight) {
                let mut lanesets = vec![departing.as_str().to_string()];
                lanesets.append(&mut edges);
                let nodes = lanesets
                    .iter()
                    .map(|id| network.lanesets[&crate::LaneSetId::new(id.as_str())]
                        .downstream_node
                        .clone())
                    .collect();
                best = Some(PathResult {
                    nodes,
                    edges: lanesets,
                    weight: total,
                });
            }
        }
    }

    best.ok_or_else(|| MapError::NoPath {
        from: source.clone(),
        to: target.clone(),
    })
}
