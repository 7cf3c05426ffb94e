//! Raw tagged ways and their derived per-entity facts.

use std::collections::BTreeMap;

use log::warn;
use rn_core::polyline::HeadingInfo;
use rn_core::{GeoPoint, Polyline};

use crate::ids::{NodeId, WayId};

/// Conversion factor for `maxspeed` tags of the form `"<number> mph"`.
pub const MPH_TO_MPS: f64 = 0.44704;

/// Speed substituted when a way carries no usable `maxspeed` tag.
pub const DEFAULT_SPEED_TAG: &str = "25 mph";

/// Marker lane count for the backward direction of a oneway: no backward
/// segment exists and none must be synthesized.
pub const NO_BACKWARD_LANES: i32 = -1;

// ── Way ───────────────────────────────────────────────────────────────────────

/// A raw tagged polyline from the source extract.
///
/// Derived facts (lane counts, speed, directionality) are computed once by
/// [`Way::from_tags`]; geometry and headings are refreshed by
/// [`Way::update_geometry`] after ingestion and again after splitting.
#[derive(Clone, Debug, Default)]
pub struct Way {
    pub id: WayId,
    pub nodes: Vec<NodeId>,
    pub tags: BTreeMap<String, String>,

    pub length_m: f64,
    pub geometry: Polyline,
    pub heading: Option<HeadingInfo>,

    /// Total `lanes` tag value; `None` when the tag was absent and the 1+1
    /// default applied.
    pub lane_count: Option<u32>,
    pub forward_lanes: u32,
    /// [`NO_BACKWARD_LANES`] for oneways.
    pub backward_lanes: i32,
    pub forward_lane_assignment: Option<String>,
    pub backward_lane_assignment: Option<String>,

    pub oneway: bool,
    pub name: String,
    pub speed_limit_mps: f64,
}

impl Way {
    /// Build a way and compute its derived facts from the raw tags.
    ///
    /// Missing tags get documented defaults: one lane per direction, 25 mph.
    /// An undirected `lanes=n` without per-direction tags splits `n/2` each
    /// way (integer division, so odd totals lose a lane).
    pub fn from_tags(
        id: WayId,
        nodes: Vec<NodeId>,
        tags: BTreeMap<String, String>,
    ) -> Self {
        let mut way = Way {
            id,
            nodes,
            tags,
            ..Way::default()
        };
        way.derive_facts();
        way
    }

    fn derive_facts(&mut self) {
        let speed_tag = self
            .tags
            .get("maxspeed")
            .or_else(|| self.tags.get("maxspeed:forward"))
            .map(String::as_str)
            .unwrap_or(DEFAULT_SPEED_TAG);
        let mph = speed_tag
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or_else(|| {
                warn!("{}: unparseable maxspeed {speed_tag:?}, assuming 25 mph", self.id);
                25.0
            });
        self.speed_limit_mps = mph * MPH_TO_MPS;

        self.oneway = self.tags.get("oneway").is_some_and(|v| v == "yes");
        let mut backward: Option<i32> = self.oneway.then_some(NO_BACKWARD_LANES);

        self.name = self
            .tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| "null".to_string());

        if let Some(total) = self.tags.get("lanes").and_then(|v| v.parse::<u32>().ok()) {
            self.lane_count = Some(total);

            if let Some(n) = self.tags.get("lanes:backward").and_then(|v| v.parse().ok()) {
                backward = Some(n);
            }
            let mut forward: Option<u32> =
                self.tags.get("lanes:forward").and_then(|v| v.parse().ok());

            if self.oneway {
                forward = Some(total);
            } else {
                match (forward, backward) {
                    (None, None) => {
                        forward = Some(total / 2);
                        backward = Some((total / 2) as i32);
                    }
                    (Some(f), None) => backward = Some(total.saturating_sub(f) as i32),
                    (None, Some(b)) => forward = Some(total.saturating_sub(b.max(0) as u32)),
                    (Some(_), Some(_)) => {}
                }
            }
            self.forward_lanes = forward.unwrap_or(1);
            self.backward_lanes = backward.unwrap_or(1);

            if let Some(assign) = self.tags.get("turn:lanes") {
                self.forward_lane_assignment = Some(assign.clone());
            }
            if let Some(assign) = self.tags.get("turn:lanes:backward") {
                self.backward_lane_assignment = Some(assign.clone());
            }
            if let Some(assign) = self.tags.get("turn:lanes:forward") {
                self.forward_lane_assignment = Some(assign.clone());
            }
        } else {
            self.lane_count = None;
            self.forward_lanes = 1;
            self.backward_lanes = if self.oneway { NO_BACKWARD_LANES } else { 1 };
            warn!("{} does not have a lane number, defaulting to 1 per direction", self.id);
        }
    }

    /// Refresh geometry, length, and heading summary from resolved node
    /// coordinates.
    pub fn update_geometry(&mut self, points: Vec<GeoPoint>) {
        let geometry = Polyline::new(points);
        self.length_m = geometry.length_m();
        self.heading = geometry.heading_info();
        self.geometry = geometry;
    }

    pub fn forward_heading(&self) -> f64 {
        self.heading.map(|h| h.forward).unwrap_or_default()
    }

    pub fn backward_heading(&self) -> f64 {
        self.heading.map(|h| h.backward).unwrap_or_default()
    }
}
