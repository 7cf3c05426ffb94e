//! The `Network` container: per-type entity arenas plus the query surface.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use rstar::primitives::GeomWithData;
use rstar::RTree;
use rn_core::{BoundingBox, GeoPoint};

use crate::arterial::Arterial;
use crate::connector::Connector;
use crate::error::MapResult;
use crate::graph::{self, EdgeWeight, Granularity, PathResult, RouteGraph};
use crate::ids::{
    ArterialId, ConnectorId, LaneSetId, LinkId, MovementId, NodeId, SegmentId, WayId,
};
use crate::laneset::LaneSet;
use crate::link::Link;
use crate::movement::Movement;
use crate::node::Node;
use crate::segment::Segment;
use crate::way::Way;

type NodePosition = GeomWithData<[f64; 2], NodeId>;

/// Lazily built, shareable read-side structures.  `OnceLock` keeps the
/// finished network `Sync` for unlimited concurrent queries.
#[derive(Default)]
struct QueryCaches {
    segment_graph: OnceLock<RouteGraph>,
    link_graph: OnceLock<RouteGraph>,
    laneset_graph: OnceLock<RouteGraph>,
    rtree: OnceLock<RTree<NodePosition>>,
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Owner of every entity arena and the read-side query layer.
///
/// Entities reference each other through typed string-ID handles into these
/// arenas, never through direct references.  Arenas are `BTreeMap` so every
/// iteration order, and therefore the whole pipeline, is deterministic.
#[derive(Default)]
pub struct Network {
    pub region: String,

    pub nodes: BTreeMap<NodeId, Node>,
    pub ways: BTreeMap<WayId, Way>,
    pub segments: BTreeMap<SegmentId, Segment>,
    pub links: BTreeMap<LinkId, Link>,
    pub movements: BTreeMap<MovementId, Movement>,
    pub lanesets: BTreeMap<LaneSetId, LaneSet>,
    pub connectors: BTreeMap<ConnectorId, Connector>,
    pub arterials: BTreeMap<ArterialId, Arterial>,

    /// Classification membership lists, populated by the node classifier.
    pub signalized_nodes: Vec<NodeId>,
    pub unsignalized_nodes: Vec<NodeId>,
    pub end_nodes: Vec<NodeId>,

    pub bounds: Option<BoundingBox>,

    caches: QueryCaches,
}

impl Network {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    // ── Arena insertion ───────────────────────────────────────────────────────

    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn add_way(&mut self, way: Way) {
        self.ways.insert(way.id.clone(), way);
    }

    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.insert(segment.id.clone(), segment);
    }

    /// Insert a link; a colliding id (parallel links between the same two
    /// nodes) gets `suffix` appended first.
    pub fn add_link(&mut self, mut link: Link, suffix: Option<&str>) -> LinkId {
        if let Some(suffix) = suffix {
            if self.links.contains_key(&link.id) {
                link.id = LinkId::new(format!("{}{suffix}", link.id));
            }
        }
        let id = link.id.clone();
        self.links.insert(id.clone(), link);
        id
    }

    pub fn add_movement(&mut self, movement: Movement) {
        self.movements.insert(movement.id.clone(), movement);
    }

    pub fn add_laneset(&mut self, laneset: LaneSet) {
        self.lanesets.insert(laneset.id.clone(), laneset);
    }

    pub fn add_connector(&mut self, connector: Connector) {
        self.connectors.insert(connector.id.clone(), connector);
    }

    pub fn add_arterial(&mut self, arterial: Arterial) {
        self.arterials.insert(arterial.id.clone(), arterial);
    }

    // ── Topology helpers ──────────────────────────────────────────────────────

    /// Record the directed adjacency `upstream → downstream` on both
    /// segments, ignoring duplicates.
    pub fn add_segment_connection(&mut self, upstream: &SegmentId, downstream: &SegmentId) {
        if let Some(segment) = self.segments.get_mut(upstream) {
            segment.add_downstream_segment(downstream.clone());
        }
        if let Some(segment) = self.segments.get_mut(downstream) {
            segment.add_upstream_segment(upstream.clone());
        }
    }

    /// Recompute the bounding box from all node coordinates, rounded to
    /// 5 decimal places (about a metre).
    pub fn reset_bounds(&mut self) {
        let round5 = |v: f64| (v * 1e5).round() / 1e5;
        let mut bounds: Option<BoundingBox> = None;
        for node in self.nodes.values() {
            match &mut bounds {
                Some(bb) => bb.expand(node.point),
                None => {
                    bounds = Some(BoundingBox::new(
                        node.point.lon,
                        node.point.lat,
                        node.point.lon,
                        node.point.lat,
                    ))
                }
            }
        }
        self.bounds = bounds.map(|bb| BoundingBox {
            min_lon: round5(bb.min_lon),
            min_lat: round5(bb.min_lat),
            max_lon: round5(bb.max_lon),
            max_lat: round5(bb.max_lat),
        });
    }

    /// Drop cached query graphs and the spatial index.  Must be called
    /// after any mutation that follows a query (e.g. patch application).
    pub fn invalidate_caches(&mut self) {
        self.caches = QueryCaches::default();
    }

    // ── Query surface ─────────────────────────────────────────────────────────

    pub(crate) fn graph(&self, granularity: Granularity) -> &RouteGraph {
        match granularity {
            Granularity::Segment => self
                .caches
                .segment_graph
                .get_or_init(|| graph::build_segment_graph(self)),
            Granularity::Link => self
                .caches
                .link_graph
                .get_or_init(|| graph::build_link_graph(self)),
            Granularity::LaneSet => self
                .caches
                .laneset_graph
                .get_or_init(|| graph::build_laneset_graph(self)),
        }
    }

    /// Shortest path between two non-ordinary nodes.
    ///
    /// At `LaneSet` granularity every (departing, arriving) laneset pair is
    /// evaluated and the globally cheapest wins; see
    /// [`graph::UNREACHABLE_WEIGHT`].
    pub fn shortest_path_between_nodes(
        &self,
        source: &NodeId,
        target: &NodeId,
        granularity: Granularity,
        weight: EdgeWeight,
    ) -> MapResult<PathResult> {
        match granularity {
            Granularity::LaneSet => graph::shortest_laneset_path(self, source, target, weight),
            _ => graph::shortest_path(self, source, target, granularity, weight),
        }
    }

    /// Nearest node to a coordinate, via the cached R-tree.  `None` only on
    /// an empty network.
    pub fn nearest_node(&self, point: GeoPoint) -> Option<&Node> {
        let tree = self.caches.rtree.get_or_init(|| {
            RTree::bulk_load(
                self.nodes
                    .values()
                    .map(|n| NodePosition::new([n.point.lon, n.point.lat], n.id.clone()))
                    .collect(),
            )
        });
        let found = tree.nearest_neighbor(&[point.lon, point.lat])?;
        self.nodes.get(&found.data)
    }

    pub fn node_kind(&self, id: &NodeId) -> Option<crate::node::NodeKind> {
        self.nodes.get(id).map(|n| n.kind)
    }
}
