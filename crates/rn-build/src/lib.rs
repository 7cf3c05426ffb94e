//! `rn-build` — compiles OSM-XML road extracts into an [`rn_map::Network`].
//!
//! The compiler is a fixed sequence of stages over one mutable network:
//! parse the document, prune and classify nodes, split ways at traversed
//! intersections, derive directed segments, wire them across nodes, chain
//! them into links, enumerate intersection movements, consolidate chains,
//! name intersections, apply the optional patch, slice lanesets, and
//! finally materialize lane-level connectors.  [`BuildMode`] picks how far
//! down that sequence a build runs.
//!
//! # What lives here
//!
//! | Module          | Contents                                           |
//! |-----------------|----------------------------------------------------|
//! | [`pipeline`]    | `BuildMode`, `BuildOptions`, the stage sequence    |
//! | [`diagnostics`] | the per-build warning/error accumulator            |
//! | `xml`           | OSM-XML document loading                           |
//! | `patch`         | JSON correction documents                          |
//! | `stages`        | one module per pipeline stage                      |
//! | [`error`]       | `BuildError`, `BuildResult`                        |
//!
//! Data-quality problems in the extract never abort a build: stages record
//! them in [`Diagnostics`] and keep going.  [`BuildError`] is reserved for
//! unusable inputs (I/O, malformed XML or JSON).

pub mod diagnostics;
pub mod error;
pub mod pipeline;

mod patch;
mod stages;
mod xml;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use diagnostics::Diagnostics;
pub use error::{BuildError, BuildResult};
pub use pipeline::{
    build_network, build_network_from_path, build_regions, BuildMode, BuildOptions,
    BuildOutput,
};
