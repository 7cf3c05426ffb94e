//! Polylines, heading summaries, lateral shifting, and bounding boxes.
//!
//! # Wire format
//!
//! A polyline serialises as `"lon lat;lon lat;...;lon lat"`.  Parsing the
//! string back must reproduce the original coordinate sequence exactly, so
//! `Display` uses Rust's shortest-round-trip float formatting and no
//! precision clamp.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::geo::{reverse_heading, GeoPoint};

// ── ShiftSide ─────────────────────────────────────────────────────────────────

/// Lateral shift side, relative to the direction of travel.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ShiftSide {
    Left,
    Right,
}

// ── HeadingInfo ───────────────────────────────────────────────────────────────

/// Heading summary of a polyline, all in degrees in `(-180, 180]`.
///
/// `forward` is the heading of the *final* sub-segment (the direction of
/// arrival); `backward` is the reversed heading of the *first* sub-segment.
/// The weighted variants average sub-segment headings with linearly
/// increasing weight towards the relevant end.
#[derive(Copy, Clone, Debug)]
pub struct HeadingInfo {
    pub forward: f64,
    pub weighted_forward: f64,
    pub backward: f64,
    pub weighted_backward: f64,
}

// ── Polyline ──────────────────────────────────────────────────────────────────

/// An ordered sequence of geographic points.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    /// Total length in metres (sum of haversine sub-segment lengths).
    pub fn length_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_m(w[1]))
            .sum()
    }

    /// A copy with the point order reversed.
    pub fn reversed(&self) -> Polyline {
        let mut points = self.points.clone();
        points.reverse();
        Polyline::new(points)
    }

    /// Concatenate `other` onto the end.  `skip_first` drops `other`'s
    /// first point, the usual case when the two polylines share a joint.
    pub fn append(&mut self, other: &Polyline, skip_first: bool) {
        let tail = if skip_first && !other.points.is_empty() {
            &other.points[1..]
        } else {
            &other.points[..]
        };
        self.points.extend_from_slice(tail);
    }

    /// Heading summary, or `None` for degenerate (<2 point) polylines.
    pub fn heading_info(&self) -> Option<HeadingInfo> {
        if self.points.len() < 2 {
            return None;
        }
        let headings: Vec<f64> = self
            .points
            .windows(2)
            .map(|w| w[0].heading_to(w[1]))
            .collect();

        let n = headings.len();
        let forward = headings[n - 1];
        let backward = reverse_heading(headings[0]);

        let total_weight: f64 = (1..=n).map(|w| w as f64).sum();
        let weighted_forward = headings
            .iter()
            .enumerate()
            .map(|(i, h)| (i + 1) as f64 * h)
            .sum::<f64>()
            / total_weight;
        let weighted_backward = headings
            .iter()
            .enumerate()
            .map(|(i, h)| (n - i) as f64 * reverse_heading(*h))
            .sum::<f64>()
            / total_weight;

        Some(HeadingInfo {
            forward,
            weighted_forward,
            backward,
            weighted_backward,
        })
    }

    /// Shift every point laterally by `distance_m` to the given side of the
    /// direction of travel.  Degenerate polylines are returned unchanged.
    pub fn shifted(&self, side: ShiftSide, distance_m: f64) -> Polyline {
        let Some(info) = self.heading_info() else {
            return self.clone();
        };
        let heading = info.forward;
        // Convert the travel heading (0° = east, ccw) into the compass
        // bearing (0° = north, cw) that is perpendicular on the wanted side.
        let bearing = match side {
            ShiftSide::Left if heading <= 0.0 => -heading,
            ShiftSide::Right if heading <= 0.0 => -heading + 180.0,
            ShiftSide::Left => 360.0 - heading,
            ShiftSide::Right => 180.0 - heading,
        };
        let points = self
            .points
            .iter()
            .map(|p| p.offset_by(bearing, distance_m))
            .collect();
        Polyline::new(points)
    }

    /// Split into `pieces` polylines of equal arc length.  Interior cut
    /// points are great-circle interpolated; adjacent pieces share their
    /// joint point.
    pub fn split_even(&self, pieces: usize) -> Vec<Polyline> {
        if self.points.len() < 2 || pieces == 0 {
            return vec![self.clone()];
        }
        let seg_len: Vec<f64> = self
            .points
            .windows(2)
            .map(|w| w[0].distance_m(w[1]))
            .collect();
        let total: f64 = seg_len.iter().sum();
        let unit = total / pieces as f64;

        let mut out = Vec::with_capacity(pieces);
        let mut seg = 0usize;
        let mut walked = 0.0; // length consumed before the current segment
        let mut cursor = self.points[0];

        for i in 0..pieces {
            let mut piece = vec![cursor];
            let target = (i + 1) as f64 * unit;
            // advance whole segments fully inside this piece
            while seg + 1 < seg_len.len() && walked + seg_len[seg] < target - 1e-9 {
                walked += seg_len[seg];
                seg += 1;
                piece.push(self.points[seg]);
            }
            let fraction = ((target - walked) / seg_len[seg]).clamp(0.0, 1.0);
            let cut = self.points[seg].intermediate(self.points[seg + 1], fraction);
            piece.push(cut);
            cursor = cut;
            out.push(Polyline::new(piece));
        }
        out
    }

    /// Axis-aligned bounding box, or `None` when empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }
}

impl fmt::Display for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{} {}", p.lon, p.lat)?;
        }
        Ok(())
    }
}

impl FromStr for Polyline {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut points = Vec::new();
        for pair in s.split(';') {
            let mut fields = pair.split_whitespace();
            let (Some(lon), Some(lat)) = (fields.next(), fields.next()) else {
                return Err(CoreError::GeometryParse(pair.to_string()));
            };
            let lon: f64 = lon
                .parse()
                .map_err(|_| CoreError::GeometryParse(pair.to_string()))?;
            let lat: f64 = lat
                .parse()
                .map_err(|_| CoreError::GeometryParse(pair.to_string()))?;
            points.push(GeoPoint::new(lat, lon));
        }
        Ok(Polyline::new(points))
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// An axis-aligned lat/lon rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Build from two corner coordinates, in either order.
    pub fn new(lon_1: f64, lat_1: f64, lon_2: f64, lat_2: f64) -> Self {
        Self {
            min_lon: lon_1.min(lon_2),
            min_lat: lat_1.min(lat_2),
            max_lon: lon_1.max(lon_2),
            max_lat: lat_1.max(lat_2),
        }
    }

    /// Smallest box containing all `points`; `None` when empty.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut bb = BoundingBox::new(first.lon, first.lat, first.lon, first.lat);
        for p in &points[1..] {
            bb.expand(*p);
        }
        Some(bb)
    }

    /// Grow the box to include `point`.
    pub fn expand(&mut self, point: GeoPoint) {
        self.min_lon = self.min_lon.min(point.lon);
        self.max_lon = self.max_lon.max(point.lon);
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lon >= self.min_lon
            && point.lon <= self.max_lon
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }
}
