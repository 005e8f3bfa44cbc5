//! `gridloc-hal` – hardware seam for the grid robot.
//!
//! The localizer and planner only ever talk to the traits defined here, so a
//! physical robot and the in-process simulator are interchangeable.
//!
//! # Modules
//!
//! - [`sensor`] – [`ColorSensor`][sensor::ColorSensor]: noise-filtered color
//!   readings under the robot and at its four diagonal neighbours.
//! - [`drive`] – [`Drive`][drive::Drive]: advance one road segment, turn in
//!   place or pivot on a wheel.
//! - [`feedback`] – [`Feedback`][feedback::Feedback]: audible/visual cues on
//!   state changes.
//! - [`vote`] – [`majority_vote`][vote::majority_vote]: deterministic majority
//!   filter over raw color samples.
//! - [`sim`] – [`SimRobot`][sim::SimRobot] and
//!   [`SimFeedback`][sim::SimFeedback]: a simulated robot driving on a known
//!   [`GridMap`][gridloc_perception::GridMap], for tests and headless runs.

pub mod drive;
pub mod feedback;
pub mod sensor;
pub mod sim;
pub mod vote;

pub use drive::{Drive, PivotMode};
pub use feedback::{Cue, Feedback};
pub use sensor::{ColorSensor, observe};
pub use sim::{SimFeedback, SimRobot};
pub use vote::majority_vote;
