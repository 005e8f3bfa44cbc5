//! [`Mission`] – localize, then drive to the target and on to the destination.
//!
//! A mission runs in three phases against one robot:
//!
//! 1. **Localize** – [`Localizer::run`] until the pose estimate converges.
//!    A [`Cue::Converged`] is emitted.
//! 2. **First leg** – [`plan`] from the estimated cell to the target and
//!    execute it.
//! 3. **Second leg** – plan from the target to the destination, starting
//!    from the heading the first leg ended in, and execute it.  A
//!    [`Cue::Complete`] is emitted.
//!
//! Any error aborts the mission with a [`Cue::Failed`].  Feedback cues are
//! best-effort: a failing buzzer or LED is logged and never fails a mission.
//! Every run produces a [`MissionReport`].

use std::sync::atomic::AtomicBool;

use chrono::{DateTime, Utc};
use gridloc_hal::{ColorSensor, Cue, Drive, Feedback, PivotMode};
use gridloc_perception::MapFile;
use gridloc_types::{Cell, GridError, Heading};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::estimator::PoseEstimate;
use crate::localizer::{Localizer, LocalizerConfig};
use crate::planner::{Directive, Plan, plan};

// ─────────────────────────────────────────────────────────────────────────────
// Report
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MissionOutcome {
    Completed,
    Failed { error: GridError },
}

/// Record of one mission run, serializable as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Filter iterations spent localizing.
    pub iterations: usize,
    /// Converged pose estimate, if localization succeeded.
    pub estimate: Option<PoseEstimate>,
    pub target: Cell,
    pub destination: Cell,
    /// Planned legs that were executed in full.
    pub legs: Vec<Plan>,
    /// Heading at the end of the last executed leg.
    pub final_heading: Option<Heading>,
    pub outcome: MissionOutcome,
}

impl MissionReport {
    pub fn is_success(&self) -> bool {
        self.outcome == MissionOutcome::Completed
    }

    /// The converged estimate on success, the aborting error otherwise.
    pub fn into_result(self) -> Result<PoseEstimate, GridError> {
        match (self.outcome, self.estimate) {
            (MissionOutcome::Completed, Some(estimate)) => Ok(estimate),
            (MissionOutcome::Failed { error }, _) => Err(error),
            (MissionOutcome::Completed, None) => Err(GridError::LocalizationFailed {
                iterations: self.iterations,
                best_weight: 0.0,
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mission
// ─────────────────────────────────────────────────────────────────────────────

pub struct Mission {
    localizer: Localizer,
    target: Cell,
    destination: Cell,
}

impl Mission {
    pub fn new(localizer: Localizer, target: Cell, destination: Cell) -> Self {
        Self {
            localizer,
            target,
            destination,
        }
    }

    /// Build a mission from a parsed map file.
    pub fn from_map_file(file: MapFile, config: LocalizerConfig) -> Self {
        let MapFile {
            map,
            target,
            destination,
        } = file;
        Self::new(Localizer::new(map, config), target, destination)
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn target(&self) -> Cell {
        self.target
    }

    pub fn destination(&self) -> Cell {
        self.destination
    }

    /// Run the mission to completion or first error.
    ///
    /// Never panics and never returns early without a report; inspect
    /// [`MissionReport::outcome`] or call [`MissionReport::into_result`].
    pub fn run<R>(
        &mut self,
        robot: &mut R,
        feedback: &mut dyn Feedback,
        cancel: &AtomicBool,
    ) -> MissionReport
    where
        R: Drive + ColorSensor + ?Sized,
    {
        let id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%id, target = %self.target, destination = %self.destination, "mission started");

        let mut legs = Vec::new();
        let mut estimate = None;
        let result = self.drive(robot, feedback, cancel, &mut estimate, &mut legs);

        let outcome = match result {
            Ok(()) => {
                info!(%id, legs = legs.len(), "mission complete");
                emit(feedback, Cue::Complete);
                MissionOutcome::Completed
            }
            Err(error) => {
                warn!(%id, %error, "mission failed");
                emit(feedback, Cue::Failed);
                MissionOutcome::Failed { error }
            }
        };

        MissionReport {
            id,
            started_at,
            finished_at: Utc::now(),
            iterations: self.localizer.iterations(),
            estimate,
            target: self.target,
            destination: self.destination,
            final_heading: legs.last().map(|leg| leg.heading),
            legs,
            outcome,
        }
    }

    fn drive<R>(
        &mut self,
        robot: &mut R,
        feedback: &mut dyn Feedback,
        cancel: &AtomicBool,
        estimate: &mut Option<PoseEstimate>,
        legs: &mut Vec<Plan>,
    ) -> Result<(), GridError>
    where
        R: Drive + ColorSensor + ?Sized,
    {
        let converged = self.localizer.run(robot, cancel)?;
        *estimate = Some(converged);
        emit(feedback, Cue::Converged);

        let to_target = plan(converged.pose.cell, self.target, converged.pose.heading);
        info!(
            from = %converged.pose,
            to = %self.target,
            turns = to_target.turns(),
            advances = to_target.advances(),
            "driving to target"
        );
        execute(robot, &to_target)?;
        let heading = to_target.heading;
        legs.push(to_target);

        let to_destination = plan(self.target, self.destination, heading);
        info!(
            from = %self.target,
            to = %self.destination,
            turns = to_destination.turns(),
            advances = to_destination.advances(),
            "driving to destination"
        );
        execute(robot, &to_destination)?;
        legs.push(to_destination);
        Ok(())
    }
}

/// Send every directive of `leg` to the drive base, in order.
pub fn execute<D: Drive + ?Sized>(drive: &mut D, leg: &Plan) -> Result<(), GridError> {
    for directive in &leg.directives {
        match directive {
            Directive::Turn(turn) => drive.turn(turn.degrees(), PivotMode::InPlace)?,
            Directive::Advance => drive.advance_segment()?,
        }
    }
    Ok(())
}

fn emit(feedback: &mut dyn Feedback, cue: Cue) {
    if let Err(e) = feedback.cue(cue) {
        warn!(?cue, error = %e, "feedback cue failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridloc_hal::{SimFeedback, SimRobot};
    use gridloc_perception::GridMap;
    use gridloc_types::{Color, GridCellObservation, Pose};

    fn marked_map() -> GridMap {
        let mut cells = vec![GridCellObservation::uniform(Color::White); 15];
        cells[7] = GridCellObservation::new(Color::Red, Color::Green, Color::Blue, Color::Yellow);
        GridMap::new(3, 5, cells).unwrap()
    }

    struct BrokenFeedback;

    impl Feedback for BrokenFeedback {
        fn cue(&mut self, _cue: Cue) -> Result<(), GridError> {
            Err(GridError::HardwareFault {
                component: "buzzer".into(),
                details: "disconnected".into(),
            })
        }
    }

    #[test]
    fn mission_ends_at_destination() {
        let map = marked_map();
        let mut robot = SimRobot::new(map.clone(), Pose::new(1, 0, Heading::South));
        let mut feedback = SimFeedback::new();
        let mut mission = Mission::new(
            Localizer::new(map, LocalizerConfig::default()),
            Cell::new(0, 0),
            Cell::new(2, 4),
        );

        let report = mission.run(&mut robot, &mut feedback, &AtomicBool::new(false));

        assert!(report.is_success(), "{:?}", report.outcome);
        assert_eq!(robot.pose().cell, Cell::new(2, 4));
        assert_eq!(Some(robot.pose().heading), report.final_heading);
        assert_eq!(feedback.cues(), &[Cue::Converged, Cue::Complete]);
        assert_eq!(report.legs.len(), 2);
        assert_eq!(report.iterations, 2);
        assert!(report.finished_at >= report.started_at);

        let estimate = report.into_result().unwrap();
        assert_eq!(estimate.pose, Pose::new(1, 2, Heading::South));
    }

    #[test]
    fn first_leg_passes_through_target() {
        let map = marked_map();
        let mut robot = SimRobot::new(map.clone(), Pose::new(1, 1, Heading::South));
        let mut feedback = SimFeedback::new();
        let mut mission = Mission::new(
            Localizer::new(map, LocalizerConfig::default()),
            Cell::new(2, 0),
            Cell::new(2, 0),
        );

        let report = mission.run(&mut robot, &mut feedback, &AtomicBool::new(false));
        assert!(report.is_success());
        assert_eq!(robot.pose().cell, Cell::new(2, 0));
        // Target and destination coincide: the second leg is empty.
        assert!(report.legs[1].directives.is_empty());
    }

    #[test]
    fn localization_failure_is_reported_and_cued() {
        let map = marked_map();
        let mut robot = SimRobot::new(map.clone(), Pose::new(0, 0, Heading::East));
        let mut feedback = SimFeedback::new();
        let config = LocalizerConfig {
            max_iterations: 4,
            ..LocalizerConfig::default()
        };
        let mut mission = Mission::new(Localizer::new(map, config), Cell::new(0, 0), Cell::new(2, 4));

        let report = mission.run(&mut robot, &mut feedback, &AtomicBool::new(false));
        assert!(!report.is_success());
        assert!(report.estimate.is_none());
        assert!(report.legs.is_empty());
        assert_eq!(feedback.cues(), &[Cue::Failed]);
        assert!(matches!(
            report.into_result(),
            Err(GridError::LocalizationFailed { iterations: 4, .. })
        ));
    }

    #[test]
    fn broken_feedback_does_not_fail_the_mission() {
        let map = marked_map();
        let mut robot = SimRobot::new(map.clone(), Pose::new(1, 1, Heading::South));
        let mut mission = Mission::new(
            Localizer::new(map, LocalizerConfig::default()),
            Cell::new(0, 4),
            Cell::new(1, 1),
        );
        let report = mission.run(&mut robot, &mut BrokenFeedback, &AtomicBool::new(false));
        assert!(report.is_success());
        assert_eq!(robot.pose().cell, Cell::new(1, 1));
    }

    #[test]
    fn report_serializes_to_json() {
        let map = marked_map();
        let mut robot = SimRobot::new(map.clone(), Pose::new(1, 1, Heading::South));
        let mut mission = Mission::new(
            Localizer::new(map, LocalizerConfig::default()),
            Cell::new(0, 0),
            Cell::new(2, 2),
        );
        let report = mission.run(&mut robot, &mut SimFeedback::new(), &AtomicBool::new(false));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["status"], "completed");
        assert_eq!(json["target"]["x"], 0);
        let back: MissionReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, report.id);
        assert_eq!(back.legs, report.legs);
        assert_eq!(back.outcome, MissionOutcome::Completed);
    }

    #[test]
    fn execute_sends_turns_and_advances_in_order() {
        let map = marked_map();
        let mut robot = SimRobot::new(map, Pose::new(0, 0, Heading::North));
        let leg = plan(Cell::new(0, 0), Cell::new(0, 3), Heading::North);
        execute(&mut robot, &leg).unwrap();
        assert_eq!(robot.pose(), Pose::new(0, 3, Heading::South));
        assert_eq!(robot.turns(), 1);
    }
}
