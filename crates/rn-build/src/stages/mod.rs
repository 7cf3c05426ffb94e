//! The ordered semantic passes of the build pipeline.
//!
//! Each stage is one `pub(crate)` function that mutates the shared
//! [`Network`](rn_map::Network) in place and records findings on the
//! [`Diagnostics`](crate::Diagnostics) context.  [`crate::pipeline`] runs
//! them in their one valid order.

pub(crate) mod classify;
pub(crate) mod connections;
pub(crate) mod connectors;
pub(crate) mod consolidate;
pub(crate) mod ingest;
pub(crate) mod lanesets;
pub(crate) mod links;
pub(crate) mod movements;
pub(crate) mod names;
pub(crate) mod segments;
pub(crate) mod split;
