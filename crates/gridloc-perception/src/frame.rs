//! Heading-frame transforms.
//!
//! Map entries record the diagonal neighbour colors of an intersection
//! relative to the compass.  A robot sees the same four colors relative to its
//! own heading: front-right, back-right, back-left and front-left.  Because
//! both [`Heading`] and [`Diagonal`] are ordered clockwise, facing heading `h`
//! shifts every slot by `h` quarter turns:
//!
//! ```text
//! robot_slot   = (compass_slot - h) mod 4
//! compass_slot = (robot_slot   + h) mod 4
//! ```
//!
//! # Example
//!
//! ```rust
//! use gridloc_perception::frame::{to_heading_frame, to_north_frame};
//! use gridloc_types::{Color, GridCellObservation, Heading};
//!
//! let north = GridCellObservation::new(Color::Red, Color::Green, Color::Blue, Color::Yellow);
//!
//! // Facing east, the front-right neighbour is the south-east one.
//! let seen = to_heading_frame(north, Heading::East);
//! assert_eq!(seen.ne, Color::Green);
//!
//! assert_eq!(to_north_frame(seen, Heading::East), north);
//! ```

use gridloc_types::{Diagonal, GridCellObservation, Heading};

/// Robot-frame slot in which the compass diagonal `compass` is sensed when
/// facing `heading`.
pub fn sensed_direction(compass: Diagonal, heading: Heading) -> Diagonal {
    compass.rotate(-(heading.index() as i32))
}

/// Compass diagonal behind the robot-frame slot `relative` when facing
/// `heading`.  Inverse of [`sensed_direction`].
pub fn compass_direction(relative: Diagonal, heading: Heading) -> Diagonal {
    relative.rotate(heading.index() as i32)
}

/// Rotate a north-oriented observation into the frame of a robot facing
/// `heading`.
pub fn to_heading_frame(north: GridCellObservation, heading: Heading) -> GridCellObservation {
    GridCellObservation::from_array(
        Diagonal::ALL.map(|slot| north.get(compass_direction(slot, heading))),
    )
}

/// Rotate a robot-frame observation taken while facing `heading` back into
/// the north-oriented frame.
pub fn to_north_frame(relative: GridCellObservation, heading: Heading) -> GridCellObservation {
    GridCellObservation::from_array(
        Diagonal::ALL.map(|compass| relative.get(sensed_direction(compass, heading))),
    )
}
