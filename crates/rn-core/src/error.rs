//! Core error type.
//!
//! Sub-crates define their own error enums and either wrap `CoreError` as a
//! variant or convert it via `From`.  Both patterns appear downstream; prefer
//! whichever keeps error sites clean.

use thiserror::Error;

/// Errors from the geometry and compass primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unparseable geometry fragment: {0:?}")]
    GeometryParse(String),

    #[error("polyline needs at least two points, got {0}")]
    DegeneratePolyline(usize),

    #[error("unknown movement index {0} (expected 1..=16)")]
    UnknownMovementIndex(u8),
}

/// Shorthand result type for `rn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
