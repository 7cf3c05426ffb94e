//! Strongly typed identifier wrappers.
//!
//! Identifiers in this model carry *semantic* formats — a segment id is its
//! way id plus a direction suffix, a link id is `"{upNode}_{downNode}"`, a
//! laneset id is `"{segmentId}_{offset}"` — so the wrappers hold `String`
//! rather than an integer.  The newtypes keep the formats from being mixed
//! up at call sites; `as_str()` exposes the raw form where an id has to be
//! composed into a longer one.

use std::fmt;

/// Generate a typed ID wrapper around a `String`.
macro_rules! typed_str_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_str_id! {
    /// Identifier of a point node, as it appears in the source extract.
    pub struct NodeId;
}

typed_str_id! {
    /// Identifier of a raw tagged way.  Split sub-ways append a sequence
    /// suffix to the parent id.
    pub struct WayId;
}

typed_str_id! {
    /// Identifier of a directed segment: way id + `"0"` (forward) or `"1"`
    /// (backward).
    pub struct SegmentId;
}

typed_str_id! {
    /// Identifier of a link: `"{upstreamNodeId}_{downstreamNodeId}"`, with an
    /// `r` suffix appended on collision.
    pub struct LinkId;
}

typed_str_id! {
    /// Identifier of a movement: `"{upstreamLinkId}_{downstreamLinkEndNodeId}"`.
    pub struct MovementId;
}

typed_str_id! {
    /// Identifier of a laneset: `"{segmentId}_{offset}"` where offset 0 is the
    /// through/shared group, positive is left, negative is right.
    pub struct LaneSetId;
}

typed_str_id! {
    /// Identifier of a laneset connector:
    /// `"{upstreamLanesetId}_{downstreamLanesetId}"`.
    pub struct ConnectorId;
}

typed_str_id! {
    /// Identifier of a named arterial aggregate.
    pub struct ArterialId;
}
