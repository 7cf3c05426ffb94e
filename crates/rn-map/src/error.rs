//! Map-model error type.

use thiserror::Error;

use crate::ids::{LinkId, NodeId};

/// Errors from the network container and query layer.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("link {0} not found")]
    LinkNotFound(LinkId),

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("a route needs at least two stop nodes, got {0}")]
    TooFewStops(usize),

    #[error(transparent)]
    Core(#[from] rn_core::CoreError),
}

/// Shorthand result type for `rn-map`.
pub type MapResult<T> = Result<T, MapError>;
