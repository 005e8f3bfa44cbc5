//! `gridloc-perception` – what the robot knows about the world.
//!
//! # Modules
//!
//! - [`grid_map`] – [`GridMap`][grid_map::GridMap]: static lookup of the four
//!   diagonal neighbour colors of every intersection, in the north-oriented
//!   frame.
//! - [`frame`] – heading-frame transforms that rotate a north-oriented
//!   observation into what a robot facing a given heading actually senses,
//!   and back.
//! - [`map_file`] – [`MapFile`][map_file::MapFile]: parser for the text map
//!   resource (cell colors plus target and destination cells).

pub mod frame;
pub mod grid_map;
pub mod map_file;

pub use frame::{compass_direction, sensed_direction, to_heading_frame, to_north_frame};
pub use grid_map::{GridMap, checked_cell_count};
pub use map_file::MapFile;
