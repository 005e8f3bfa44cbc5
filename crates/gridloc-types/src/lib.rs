use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compass heading of the robot or of a particle hypothesis.
///
/// Variants are ordered clockwise, so adding one step is a 90° right turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Every heading in clockwise order, starting at North.
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Clockwise index of the heading (North = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Heading for a clockwise index, taken modulo 4.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Rotate by `steps` quarter turns (positive = clockwise).
    pub fn rotate(self, steps: i32) -> Self {
        Self::from_index((self.index() as i32 + steps).rem_euclid(4) as usize)
    }

    /// The opposite heading.
    pub fn reverse(self) -> Self {
        self.rotate(2)
    }

    pub fn turn_right(self) -> Self {
        self.rotate(1)
    }

    pub fn turn_left(self) -> Self {
        self.rotate(-1)
    }

    /// Grid delta of one forward advance. North decrements `y`.
    pub fn step(self) -> (i64, i64) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    /// Signed index difference `other - self`, always within `-3..=3`.
    pub fn steps_to(self, other: Heading) -> i32 {
        other.index() as i32 - self.index() as i32
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heading::North => write!(f, "north"),
            Heading::East => write!(f, "east"),
            Heading::South => write!(f, "south"),
            Heading::West => write!(f, "west"),
        }
    }
}

impl FromStr for Heading {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Heading::North),
            "e" | "east" => Ok(Heading::East),
            "s" | "south" => Ok(Heading::South),
            "w" | "west" => Ok(Heading::West),
            other => Err(GridError::InvalidConfig(format!("unknown heading '{other}'"))),
        }
    }
}

/// One of the four diagonal neighbours of an intersection.
///
/// In the north-oriented frame the variants are compass diagonals.  When an
/// observation is expressed in a robot's own frame the same slots read
/// front-right, back-right, back-left and front-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diagonal {
    NE,
    SE,
    SW,
    NW,
}

impl Diagonal {
    /// Clockwise order, starting at NE (front-right in the robot frame).
    pub const ALL: [Diagonal; 4] = [Diagonal::NE, Diagonal::SE, Diagonal::SW, Diagonal::NW];

    pub const FRONT_RIGHT: Diagonal = Diagonal::NE;
    pub const BACK_RIGHT: Diagonal = Diagonal::SE;
    pub const BACK_LEFT: Diagonal = Diagonal::SW;
    pub const FRONT_LEFT: Diagonal = Diagonal::NW;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Rotate by `steps` quarter turns (positive = clockwise).
    pub fn rotate(self, steps: i32) -> Self {
        Self::from_index((self.index() as i32 + steps).rem_euclid(4) as usize)
    }
}

/// Discrete color code reported by the color sensor.
///
/// The numeric codes are the single digits used in map files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Yellow = 3,
    Red = 4,
    White = 5,
    Unknown = 6,
}

impl Color {
    /// Colors that may appear on a map (everything except `Unknown`).
    pub const PALETTE: [Color; 6] = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Red,
        Color::White,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a color code.  Returns `None` for codes outside `0..=6`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Color::Black),
            1 => Some(Color::Blue),
            2 => Some(Color::Green),
            3 => Some(Color::Yellow),
            4 => Some(Color::Red),
            5 => Some(Color::White),
            6 => Some(Color::Unknown),
            _ => None,
        }
    }
}

/// The four diagonal neighbour colors of one intersection.
///
/// Map entries are stored in the north-oriented frame; sensor readings use the
/// same type with slots meaning front-right / back-right / back-left /
/// front-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCellObservation {
    pub ne: Color,
    pub se: Color,
    pub sw: Color,
    pub nw: Color,
}

impl GridCellObservation {
    pub fn new(ne: Color, se: Color, sw: Color, nw: Color) -> Self {
        Self { ne, se, sw, nw }
    }

    /// All four neighbours share one color.
    pub fn uniform(color: Color) -> Self {
        Self::new(color, color, color, color)
    }

    /// Build from colors in [`Diagonal::ALL`] order.
    pub fn from_array(colors: [Color; 4]) -> Self {
        Self::new(colors[0], colors[1], colors[2], colors[3])
    }

    pub fn to_array(self) -> [Color; 4] {
        [self.ne, self.se, self.sw, self.nw]
    }

    pub fn get(&self, diagonal: Diagonal) -> Color {
        match diagonal {
            Diagonal::NE => self.ne,
            Diagonal::SE => self.se,
            Diagonal::SW => self.sw,
            Diagonal::NW => self.nw,
        }
    }
}

/// An intersection on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cell plus the heading the robot faces there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub cell: Cell,
    pub heading: Heading,
}

impl Pose {
    pub fn new(x: usize, y: usize, heading: Heading) -> Self {
        Self {
            cell: Cell::new(x, y),
            heading,
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} facing {}", self.cell, self.heading)
    }
}

/// Error type shared by every gridloc crate.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridError {
    #[error("Cell ({x}, {y}) is outside the grid")]
    OutOfRange { x: i64, y: i64 },

    #[error("Map format error on line {line}: {reason}")]
    MapFormat { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Hardware Fault on {component}: {details}")]
    HardwareFault { component: String, details: String },

    #[error("Localization failed after {iterations} iterations (best weight {best_weight:.3})")]
    LocalizationFailed { iterations: usize, best_weight: f64 },

    #[error("Localization cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
