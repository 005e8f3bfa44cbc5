//! [`Localizer`] – the convergence loop.
//!
//! Starts with every (cell, heading) hypothesis equally likely and repeats,
//! once per road segment:
//!
//! 1. **Move** – command the drive base to advance one segment, and advance
//!    every particle with the [motion model][crate::motion].
//! 2. **Sense** – scan the four diagonal neighbours in the robot's frame.
//! 3. **Reweight** – apply the [sensor model][crate::sensor_model].
//! 4. **Normalize** – rescale weights to sum to one.
//! 5. **Estimate** – take the heaviest particle as the pose estimate.
//!
//! The loop ends in [`LocalizerState::Converged`] once the estimate's weight
//! exceeds the threshold, or in [`LocalizerState::Failed`] when the
//! [`ConvergenceBudget`] runs out.  A shared cancel flag stops it early.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use gridloc_hal::{ColorSensor, Drive, observe};
use gridloc_perception::GridMap;
use gridloc_types::{GridCellObservation, GridError};
use tracing::{debug, info, warn};

use crate::budget::{BudgetStatus, ConvergenceBudget};
use crate::estimator::{PoseEstimate, WeightAccumulator, find_max};
use crate::motion;
use crate::particle::ParticleSet;
use crate::sensor_model::SensorModel;

/// Weight the best particle must exceed before its pose is accepted.
pub const THRESHOLD: f64 = 0.27;

/// Default cap on filter iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Tunables for a [`Localizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizerConfig {
    /// Convergence threshold on the best normalized weight.
    pub threshold: f64,
    pub sensor_model: SensorModel,
    /// Maximum number of filter iterations before giving up.
    pub max_iterations: usize,
    /// Optional wall-clock limit for one [`Localizer::run`].
    pub timeout: Option<Duration>,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            threshold: THRESHOLD,
            sensor_model: SensorModel::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            timeout: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────────────────────────────────────

/// Why a localization run gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    IterationBudget,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalizerState {
    Localizing,
    Converged(PoseEstimate),
    Failed(FailureReason),
}

// ─────────────────────────────────────────────────────────────────────────────
// Localizer
// ─────────────────────────────────────────────────────────────────────────────

/// Discrete Bayesian filter over every (cell, heading) of a [`GridMap`].
pub struct Localizer {
    map: GridMap,
    particles: ParticleSet,
    weights: WeightAccumulator,
    config: LocalizerConfig,
    budget: ConvergenceBudget,
    state: LocalizerState,
}

impl Localizer {
    pub fn new(map: GridMap, config: LocalizerConfig) -> Self {
        let particles = ParticleSet::uniform(&map);
        let mut budget = ConvergenceBudget::new(config.max_iterations);
        if let Some(timeout) = config.timeout {
            budget = budget.with_timeout(timeout);
        }
        Self {
            map,
            particles,
            weights: WeightAccumulator::new(),
            config,
            budget,
            state: LocalizerState::Localizing,
        }
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    pub fn state(&self) -> LocalizerState {
        self.state
    }

    /// Filter iterations completed since the last start or reset.
    pub fn iterations(&self) -> usize {
        self.budget.iterations()
    }

    /// Current best hypothesis.
    pub fn estimate(&self) -> Option<PoseEstimate> {
        find_max(&self.particles)
    }

    /// Back to a uniform belief in the [`LocalizerState::Localizing`] state.
    pub fn reset(&mut self) {
        self.particles.reset();
        self.weights.reset();
        self.budget.start();
        self.state = LocalizerState::Localizing;
    }

    /// Run one filter iteration for a robot that has just advanced one
    /// segment and sensed `observation` in its own frame.
    ///
    /// Updates [`state`][Self::state]: `Converged` when the estimate's weight
    /// exceeds the threshold, `Localizing` otherwise.
    ///
    /// # Errors
    ///
    /// Propagates [`GridError::OutOfRange`] from the map lookup, which only
    /// happens if a particle escaped the grid.
    pub fn step(&mut self, observation: GridCellObservation) -> Result<PoseEstimate, GridError> {
        motion::advance_all(&mut self.particles, &self.map);
        let matched = self.config.sensor_model.update(
            &mut self.particles,
            &self.map,
            &observation,
            &mut self.weights,
        )?;
        self.weights.normalize(&mut self.particles);
        let estimate = find_max(&self.particles)
            .ok_or_else(|| GridError::InvalidConfig("particle set is empty".to_string()))?;
        self.budget.record();

        debug!(
            iteration = self.budget.iterations(),
            matched,
            best = %estimate.pose,
            weight = estimate.weight,
            "filter iteration"
        );

        if estimate.weight > self.config.threshold {
            if !matches!(self.state, LocalizerState::Converged(_)) {
                info!(
                    pose = %estimate.pose,
                    weight = estimate.weight,
                    iterations = self.budget.iterations(),
                    "localization converged"
                );
            }
            self.state = LocalizerState::Converged(estimate);
        } else {
            self.state = LocalizerState::Localizing;
        }
        Ok(estimate)
    }

    /// Drive `robot` segment by segment until the filter converges.
    ///
    /// # Errors
    ///
    /// - [`GridError::LocalizationFailed`] when the iteration or time budget
    ///   runs out (the state becomes [`LocalizerState::Failed`]).
    /// - [`GridError::Cancelled`] when `cancel` is raised.
    /// - Any [`GridError::HardwareFault`] from the robot.
    pub fn run<R>(&mut self, robot: &mut R, cancel: &AtomicBool) -> Result<PoseEstimate, GridError>
    where
        R: Drive + ColorSensor + ?Sized,
    {
        if let LocalizerState::Converged(estimate) = self.state {
            return Ok(estimate);
        }
        self.budget.start();
        self.state = LocalizerState::Localizing;

        loop {
            if let LocalizerState::Converged(estimate) = self.state {
                return Ok(estimate);
            }
            if cancel.load(Ordering::SeqCst) {
                warn!(iterations = self.iterations(), "localization cancelled");
                return Err(GridError::Cancelled {
                    iterations: self.iterations(),
                });
            }
            let reason = match self.budget.check() {
                BudgetStatus::Within => None,
                BudgetStatus::IterationsExhausted => Some(FailureReason::IterationBudget),
                BudgetStatus::TimedOut => Some(FailureReason::Timeout),
            };
            if let Some(reason) = reason {
                let best = self.estimate();
                let best_weight = best.map_or(0.0, |e| e.weight);
                warn!(
                    ?reason,
                    iterations = self.iterations(),
                    best = ?best.map(|e| e.pose),
                    weight = best_weight,
                    "localization failed to converge"
                );
                self.state = LocalizerState::Failed(reason);
                return Err(GridError::LocalizationFailed {
                    iterations: self.iterations(),
                    best_weight,
                });
            }

            robot.advance_segment()?;
            let observation = observe(robot)?;
            self.step(observation)?;
        }
    }
}
