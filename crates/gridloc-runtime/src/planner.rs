//! Axis-aligned route planner.
//!
//! Converts a pose and a goal cell into turn and advance directives.  The
//! horizontal offset is resolved first (face West or East, then advance
//! `|dx|` cells), then the vertical one (face North or South, then advance
//! `|dy|` cells).  The resulting heading is returned so a second leg can be
//! chained without re-deriving it.
//!
//! # Example
//!
//! ```rust
//! use gridloc_runtime::planner::{Directive, Turn, plan};
//! use gridloc_types::{Cell, Heading};
//!
//! let leg = plan(Cell::new(0, 0), Cell::new(2, 0), Heading::North);
//! assert_eq!(leg.heading, Heading::East);
//! assert_eq!(
//!     leg.directives,
//!     vec![Directive::Turn(Turn::Right), Directive::Advance, Directive::Advance]
//! );
//! ```

use std::fmt;

use gridloc_types::{Cell, Heading};
use serde::{Deserialize, Serialize};

/// An in-place rotation between two compass headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    /// 90° clockwise.
    Right,
    /// 90° counter-clockwise.
    Left,
    /// 180°.
    Around,
}

impl Turn {
    /// Signed rotation in degrees, positive clockwise.
    pub fn degrees(self) -> i32 {
        match self {
            Turn::Right => 90,
            Turn::Left => -90,
            Turn::Around => 180,
        }
    }

    /// The turn that takes `from` to `to`, or `None` when already facing it.
    ///
    /// The signed index difference `-3..=3` maps to: ±1 a quarter turn in
    /// that sense, ±2 a half turn, ±3 a quarter turn the other way.
    pub fn between(from: Heading, to: Heading) -> Option<Turn> {
        match from.steps_to(to) {
            0 => None,
            1 | -3 => Some(Turn::Right),
            -1 | 3 => Some(Turn::Left),
            _ => Some(Turn::Around),
        }
    }

    /// Heading after applying this turn to `heading`.
    pub fn apply(self, heading: Heading) -> Heading {
        heading.rotate(self.degrees() / 90)
    }
}

/// One motion command for the drive base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    Turn(Turn),
    /// Advance one grid cell along the current heading.
    Advance,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Turn(Turn::Right) => write!(f, "turn right"),
            Directive::Turn(Turn::Left) => write!(f, "turn left"),
            Directive::Turn(Turn::Around) => write!(f, "turn around"),
            Directive::Advance => write!(f, "advance"),
        }
    }
}

/// A planned leg: the directives to execute and the heading afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub heading: Heading,
    pub directives: Vec<Directive>,
}

impl Plan {
    pub fn advances(&self) -> usize {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::Advance))
            .count()
    }

    pub fn turns(&self) -> usize {
        self.directives.len() - self.advances()
    }
}

/// Plan a route from `from` (facing `heading`) to `to`.
///
/// Every pair of in-grid cells is reachable, so planning cannot fail.
pub fn plan(from: Cell, to: Cell, heading: Heading) -> Plan {
    let mut heading = heading;
    let mut directives = Vec::new();

    let dx = to.x as i64 - from.x as i64;
    if dx != 0 {
        let face = if dx < 0 { Heading::West } else { Heading::East };
        push_leg(&mut directives, &mut heading, face, dx.unsigned_abs());
    }

    let dy = to.y as i64 - from.y as i64;
    if dy != 0 {
        let face = if dy > 0 { Heading::South } else { Heading::North };
        push_leg(&mut directives, &mut heading, face, dy.unsigned_abs());
    }

    Plan {
        heading,
        directives,
    }
}

fn push_leg(directives: &mut Vec<Directive>, heading: &mut Heading, face: Heading, cells: u64) {
    if let Some(turn) = Turn::between(*heading, face) {
        directives.push(Directive::Turn(turn));
        *heading = face;
    }
    directives.extend(std::iter::repeat_n(Directive::Advance, cells as usize));
}
