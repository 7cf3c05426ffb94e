//! `rn-map` — the road-network entity model and its query surface.
//!
//! Everything the build pipeline produces lives here: typed string IDs, the
//! entity types, the [`Network`] container that owns them in per-type
//! arenas, and the derived weighted-graph query layer (shortest paths,
//! nearest-node snapping, bounding box).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `WayId`, `SegmentId`, `LinkId`, ...           |
//! | [`node`]      | `Node`, `NodeKind`                                      |
//! | [`way`]       | `Way` and its derived tag facts                         |
//! | [`segment`]   | `Segment`, `SegmentDirection`                           |
//! | [`link`]      | `Link`, the free-flow speed fallback                    |
//! | [`movement`]  | `Movement`                                              |
//! | [`laneset`]   | `LaneSet`                                               |
//! | [`connector`] | `Connector`, `ConnectorKind`                            |
//! | [`arterial`]  | `Arterial`, `Path`                                      |
//! | [`network`]   | the `Network` container                                 |
//! | [`graph`]     | `Granularity`, `EdgeWeight`, `PathResult`, Dijkstra     |
//! | [`error`]     | `MapError`, `MapResult`                                 |
//!
//! # Concurrency
//!
//! The pipeline mutates a `Network` exclusively; once construction (and the
//! optional patch) finishes, the network is safe for unlimited concurrent
//! read-only queries — derived graphs and the R-tree are `OnceLock`-cached.

pub mod arterial;
pub mod connector;
pub mod error;
pub mod graph;
pub mod ids;
pub mod laneset;
pub mod link;
pub mod movement;
pub mod network;
pub mod node;
pub mod segment;
pub mod way;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use arterial::{Arterial, Path};
pub use connector::{Connector, ConnectorKind};
pub use error::{MapError, MapResult};
pub use graph::{EdgeWeight, Granularity, PathResult, UNREACHABLE_WEIGHT};
pub use ids::{
    ArterialId, ConnectorId, LaneSetId, LinkId, MovementId, NodeId, SegmentId, WayId,
};
pub use laneset::LaneSet;
pub use link::{effective_speed, Link, FALLBACK_FREE_FLOW_MPS};
pub use movement::Movement;
pub use network::Network;
pub use node::{Node, NodeKind};
pub use segment::{Segment, SegmentDirection, LANE_DISPLAY_INTERVAL_M};
pub use way::{Way, MPH_TO_MPS, NO_BACKWARD_LANES};
