//! Compass quadrants, turn kinds, and the standard movement-index table.
//!
//! Intersections are modelled NEMA-style: every turning maneuver at a
//! four-approach junction has a standard index in 1..=16, determined by the
//! approach direction and the turn kind.  Indices 1–8 are the signalised
//! left/through phases, 9–12 the right turns, 13–16 the U-turns.

use std::fmt;

/// Wrap an angle in degrees into `[-180, 180)`.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

// ── CompassDirection ──────────────────────────────────────────────────────────

/// The quadrant a road piece *comes from*.
///
/// A segment heading due east originates from the west, so its direction is
/// `West`.  Headings are in `(-180, 180]` with 0° pointing east.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompassDirection {
    #[default]
    North,
    South,
    East,
    West,
}

impl CompassDirection {
    /// Quadrant for a heading in `(-180, 180]`.
    pub fn from_heading(heading: f64) -> Self {
        if heading > -45.0 && heading <= 45.0 {
            CompassDirection::West
        } else if heading > 45.0 && heading <= 135.0 {
            CompassDirection::South
        } else if heading > -135.0 && heading <= -45.0 {
            CompassDirection::North
        } else {
            CompassDirection::East
        }
    }

    /// The opposite quadrant.
    pub fn inverse(self) -> Self {
        match self {
            CompassDirection::North => CompassDirection::South,
            CompassDirection::South => CompassDirection::North,
            CompassDirection::East => CompassDirection::West,
            CompassDirection::West => CompassDirection::East,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompassDirection::North => "N",
            CompassDirection::South => "S",
            CompassDirection::East => "E",
            CompassDirection::West => "W",
        }
    }

    /// Parse a single-letter direction tag value.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "N" => Some(CompassDirection::North),
            "S" => Some(CompassDirection::South),
            "E" => Some(CompassDirection::East),
            "W" => Some(CompassDirection::West),
            _ => None,
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Turn ──────────────────────────────────────────────────────────────────────

/// A turn class at an intersection, with its single-letter wire form.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    /// `l`
    Left,
    /// `r`
    Right,
    /// `s` (straight)
    Through,
    /// `b` (back, U-turn)
    UTurn,
}

impl Turn {
    pub fn as_char(self) -> char {
        match self {
            Turn::Left => 'l',
            Turn::Right => 'r',
            Turn::Through => 's',
            Turn::UTurn => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'l' => Some(Turn::Left),
            'r' => Some(Turn::Right),
            's' => Some(Turn::Through),
            'b' => Some(Turn::UTurn),
            _ => None,
        }
    }

    /// Turn class implied by a standard movement index.
    ///
    /// 1–8 alternate left (odd) / through (even); 9–12 are right turns;
    /// 13–16 are U-turns.
    pub fn from_movement_index(index: u8) -> Self {
        if index <= 8 {
            if index % 2 == 0 {
                Turn::Through
            } else {
                Turn::Left
            }
        } else if index <= 12 {
            Turn::Right
        } else {
            Turn::UTurn
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ── Movement table ────────────────────────────────────────────────────────────

/// One row of the standard movement table: index, approach (from) quadrant,
/// departure (to) quadrant, turn class.
#[derive(Copy, Clone, Debug)]
pub struct MovementEntry {
    pub index: u8,
    pub from: CompassDirection,
    pub to: CompassDirection,
    pub turn: Turn,
}

use CompassDirection::{East as E, North as N, South as S, West as W};

/// The fixed 16-entry movement table, in standard index order.
pub const MOVEMENT_TABLE: [MovementEntry; 16] = [
    MovementEntry { index: 1,  from: W, to: N, turn: Turn::Left },
    MovementEntry { index: 2,  from: E, to: W, turn: Turn::Through },
    MovementEntry { index: 3,  from: N, to: E, turn: Turn::Left },
    MovementEntry { index: 4,  from: S, to: N, turn: Turn::Through },
    MovementEntry { index: 5,  from: E, to: S, turn: Turn::Left },
    MovementEntry { index: 6,  from: W, to: E, turn: Turn::Through },
    MovementEntry { index: 7,  from: S, to: W, turn: Turn::Left },
    MovementEntry { index: 8,  from: N, to: S, turn: Turn::Through },
    MovementEntry { index: 9,  from: E, to: N, turn: Turn::Right },
    MovementEntry { index: 10, from: S, to: E, turn: Turn::Right },
    MovementEntry { index: 11, from: W, to: S, turn: Turn::Right },
    MovementEntry { index: 12, from: N, to: W, turn: Turn::Right },
    MovementEntry { index: 13, from: N, to: N, turn: Turn::UTurn },
    MovementEntry { index: 14, from: S, to: S, turn: Turn::UTurn },
    MovementEntry { index: 15, from: W, to: W, turn: Turn::UTurn },
    MovementEntry { index: 16, from: E, to: E, turn: Turn::UTurn },
];

/// Turn class of the maneuver from an approach coming from `upstream_from`
/// into a departure coming from `downstream_from`.
///
/// The downstream piece's "from" quadrant is inverted to obtain the side of
/// the intersection it leaves towards.  Total over all quadrant pairs.
pub fn moving_direction(
    upstream_from: CompassDirection,
    downstream_from: CompassDirection,
) -> Option<Turn> {
    let to = downstream_from.inverse();
    MOVEMENT_TABLE
        .iter()
        .find(|e| e.from == upstream_from && e.to == to)
        .map(|e| e.turn)
}

/// Standard movement index for an approach quadrant and turn class.
pub fn movement_index(from: CompassDirection, turn: Turn) -> Option<u8> {
    MOVEMENT_TABLE
        .iter()
        .find(|e| e.from == from && e.turn == turn)
        .map(|e| e.index)
}
