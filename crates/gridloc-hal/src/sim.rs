//! In-process simulated robot for tests and headless runs.
//!
//! [`SimRobot`] drives on a known [`GridMap`] from a hidden true pose and
//! implements both [`ColorSensor`] and [`Drive`], so the full localization
//! and planning stack can run without any physical hardware.
//!
//! # Example
//!
//! ```rust
//! use gridloc_hal::sim::SimRobot;
//! use gridloc_hal::{Drive, PivotMode};
//! use gridloc_perception::GridMap;
//! use gridloc_types::{Color, GridCellObservation, Heading, Pose};
//!
//! let map = GridMap::filled(3, 5, GridCellObservation::uniform(Color::White)).unwrap();
//! let mut robot = SimRobot::new(map, Pose::new(0, 0, Heading::North));
//!
//! // North of row 0 is off the grid: the robot reverses and drives south.
//! robot.advance_segment().expect("sim advance must succeed");
//! assert_eq!(robot.pose(), Pose::new(0, 1, Heading::South));
//!
//! robot.turn(90, PivotMode::InPlace).expect("sim turn must succeed");
//! assert_eq!(robot.pose().heading, Heading::West);
//! ```

use gridloc_perception::GridMap;
use gridloc_perception::frame::compass_direction;
use gridloc_types::{Cell, Color, Diagonal, GridError, Pose};
use tracing::debug;

use crate::drive::{Drive, PivotMode};
use crate::feedback::{Cue, Feedback};
use crate::sensor::ColorSensor;
use crate::vote::majority_vote;

// ────────────────────────────────────────────────────────────────────────────
// Simulated robot
// ────────────────────────────────────────────────────────────────────────────

/// A simulated robot on a grid of colored intersections.
///
/// Every color read takes `samples_per_read` raw samples and filters them with
/// [`majority_vote`].  [`SimRobot::with_glitch_every`] corrupts every n-th raw
/// sample to [`Color::Unknown`] so the filtering path is exercised.
pub struct SimRobot {
    id: String,
    map: GridMap,
    pose: Pose,
    road_color: Color,
    samples_per_read: usize,
    glitch_every: Option<usize>,
    raw_samples: usize,
    advances: usize,
    turns: usize,
}

impl SimRobot {
    /// Place a simulated robot on `map` at `pose`.
    pub fn new(map: GridMap, pose: Pose) -> Self {
        Self {
            id: "sim_robot".to_string(),
            map,
            pose,
            road_color: Color::Black,
            samples_per_read: 3,
            glitch_every: None,
            raw_samples: 0,
            advances: 0,
            turns: 0,
        }
    }

    /// Number of raw samples per filtered reading (at least one).
    pub fn with_samples_per_read(mut self, samples: usize) -> Self {
        self.samples_per_read = samples.max(1);
        self
    }

    /// Corrupt every `n`-th raw sample.  `0` disables corruption.
    pub fn with_glitch_every(mut self, n: usize) -> Self {
        self.glitch_every = (n > 0).then_some(n);
        self
    }

    /// The robot's true pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Number of completed segment advances.
    pub fn advances(&self) -> usize {
        self.advances
    }

    /// Number of completed turns.
    pub fn turns(&self) -> usize {
        self.turns
    }

    fn raw_sample(&mut self, truth: Color) -> Color {
        self.raw_samples += 1;
        match self.glitch_every {
            Some(n) if self.raw_samples % n == 0 => Color::Unknown,
            _ => truth,
        }
    }

    fn filtered(&mut self, truth: Color) -> Color {
        let samples: Vec<Color> = (0..self.samples_per_read)
            .map(|_| self.raw_sample(truth))
            .collect();
        majority_vote(&samples)
    }

    fn neighbour(&self, x: i64, y: i64) -> Option<Cell> {
        self.map
            .contains(x, y)
            .then(|| Cell::new(x as usize, y as usize))
    }
}

impl ColorSensor for SimRobot {
    fn id(&self) -> &str {
        &self.id
    }

    fn sample_color(&mut self) -> Result<Color, GridError> {
        Ok(self.filtered(self.road_color))
    }

    fn scan_diagonal(&mut self, direction: Diagonal) -> Result<Color, GridError> {
        let cell = self.map.lookup_cell(self.pose.cell)?;
        let truth = cell.get(compass_direction(direction, self.pose.heading));
        Ok(self.filtered(truth))
    }
}

impl Drive for SimRobot {
    fn id(&self) -> &str {
        &self.id
    }

    fn advance_segment(&mut self) -> Result<(), GridError> {
        let (x, y) = (self.pose.cell.x as i64, self.pose.cell.y as i64);
        let (dx, dy) = self.pose.heading.step();
        match self.neighbour(x + dx, y + dy) {
            Some(cell) => self.pose.cell = cell,
            None => {
                // Edge of the grid: turn around and drive back.
                self.pose.heading = self.pose.heading.reverse();
                if let Some(cell) = self.neighbour(x - dx, y - dy) {
                    self.pose.cell = cell;
                }
            }
        }
        self.advances += 1;
        debug!(pose = %self.pose, "sim robot advanced");
        Ok(())
    }

    fn turn(&mut self, degrees: i32, pivot: PivotMode) -> Result<(), GridError> {
        if degrees % 90 != 0 {
            return Err(GridError::HardwareFault {
                component: self.id.clone(),
                details: format!("sim drive only turns in multiples of 90 degrees, got {degrees}"),
            });
        }
        self.pose.heading = self.pose.heading.rotate(degrees / 90);
        self.turns += 1;
        debug!(degrees, ?pivot, heading = %self.pose.heading, "sim robot turned");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated feedback
// ────────────────────────────────────────────────────────────────────────────

/// Feedback device that records every cue.  Always succeeds.
#[derive(Debug, Default)]
pub struct SimFeedback {
    cues: Vec<Cue>,
}

impl SimFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues emitted so far, oldest first.
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }
}

impl Feedback for SimFeedback {
    fn cue(&mut self, cue: Cue) -> Result<(), GridError> {
        self.cues.push(cue);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
