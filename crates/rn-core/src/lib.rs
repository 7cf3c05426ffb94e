//! `rn-core` — geometry and compass primitives for the `rust_rn` road-network
//! compiler.
//!
//! This crate is a dependency of every other `rn-*` crate.  It intentionally
//! has no `rn-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`geo`]      | `GeoPoint`, haversine distance, headings, offsets        |
//! | [`polyline`] | `Polyline`, `BoundingBox`, heading summaries, shifting   |
//! | [`compass`]  | `CompassDirection`, `Turn`, the 16-entry movement table  |
//! | [`error`]    | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.           |

pub mod compass;
pub mod error;
pub mod geo;
pub mod polyline;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use compass::{
    moving_direction, movement_index, normalize_degrees, CompassDirection, MovementEntry, Turn,
    MOVEMENT_TABLE,
};
pub use error::{CoreError, CoreResult};
pub use geo::{heading_difference, reverse_heading, GeoPoint, EARTH_RADIUS_M};
pub use polyline::{BoundingBox, HeadingInfo, Polyline, ShiftSide};
