//! `gridloc-runtime` – Localization and Navigation Engine
//!
//! Estimates a robot's pose on a grid of colored intersections with a
//! discrete Bayesian filter, then plans and drives axis-aligned routes.
//!
//! # Modules
//!
//! - [`particle`] – [`ParticleSet`][particle::ParticleSet]: one weighted
//!   hypothesis per (cell, heading), held in a fixed arena for the life of
//!   the filter.
//! - [`motion`] – the prediction step: every particle advances one cell and
//!   bounces off the grid boundary.
//! - [`sensor_model`] – [`SensorModel`][sensor_model::SensorModel]: the
//!   measurement update that rewards particles whose predicted view matches
//!   the robot's observation.
//! - [`estimator`] – [`WeightAccumulator`][estimator::WeightAccumulator]
//!   normalization and [`find_max`][estimator::find_max] pose extraction.
//! - [`budget`] – [`ConvergenceBudget`][budget::ConvergenceBudget]: iteration
//!   and wall-clock limits so a robot on an ambiguous map stops instead of
//!   driving forever.
//! - [`localizer`] – [`Localizer`][localizer::Localizer]: the
//!   move–sense–reweight–normalize–estimate loop and its state machine.
//! - [`planner`] – [`plan`][planner::plan]: horizontal-then-vertical route
//!   planning into [`Directive`][planner::Directive]s.
//! - [`mission`] – [`Mission`][mission::Mission]: localize, drive to the
//!   target, drive to the destination, and report.
//!
//! # Hardware
//!
//! Everything that touches a robot is generic over the
//! [`Drive`][gridloc_hal::Drive] and [`ColorSensor`][gridloc_hal::ColorSensor]
//! traits, so the same loop runs against
//! [`SimRobot`][gridloc_hal::SimRobot] in tests and against real motors and
//! color sensors on a robot.

pub mod budget;
pub mod estimator;
pub mod localizer;
pub mod mission;
pub mod motion;
pub mod particle;
pub mod planner;
pub mod sensor_model;

pub use budget::{BudgetStatus, ConvergenceBudget};
pub use estimator::{PoseEstimate, WeightAccumulator, find_max};
pub use localizer::{FailureReason, Localizer, LocalizerConfig, LocalizerState, THRESHOLD};
pub use mission::{Mission, MissionOutcome, MissionReport};
pub use particle::{Particle, ParticleSet};
pub use planner::{Directive, Plan, Turn, plan};
pub use sensor_model::{MATCH, MISMATCH, SensorModel};
