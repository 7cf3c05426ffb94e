//! Build-pipeline error type.
//!
//! Only infrastructure failures surface here: unreadable input, malformed
//! XML or JSON, query-layer errors.  Data-quality findings never become an
//! `Err` — they are collected in [`Diagnostics`](crate::Diagnostics) and the
//! pipeline keeps going.

use thiserror::Error;

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed xml: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed patch file: {0}")]
    Patch(#[from] serde_json::Error),

    #[error(transparent)]
    Map(#[from] rn_map::MapError),
}

/// Shorthand result type for `rn-build`.
pub type BuildResult<T> = Result<T, BuildError>;
