//! Sensor model: the filter's measurement update.
//!
//! The robot reports the four diagonal colors of its intersection in its own
//! frame.  For every particle the model looks up the north-oriented map entry
//! at the particle's cell, rotates it into the particle's heading, and
//! compares slot by slot.  A full match raises the weight by
//! [`SensorModel::match_increment`]; anything else leaves it untouched.
//! Mismatches are expected and never an error.

use gridloc_perception::GridMap;
use gridloc_perception::frame::to_heading_frame;
use gridloc_types::{GridCellObservation, GridError};
use tracing::debug;

use crate::estimator::WeightAccumulator;
use crate::particle::{Particle, ParticleSet};

/// Weight added to a particle whose predicted view matches the observation.
pub const MATCH: f64 = 0.9;

/// Weight for a partially matching view.  Reserved for experiments with
/// partial-credit scoring and not applied by [`SensorModel`].
pub const MISMATCH: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorModel {
    pub match_increment: f64,
}

impl Default for SensorModel {
    fn default() -> Self {
        Self {
            match_increment: MATCH,
        }
    }
}

impl SensorModel {
    pub fn new(match_increment: f64) -> Self {
        Self { match_increment }
    }

    /// What a robot at the particle's pose would sense.
    pub fn predicted_view(
        particle: &Particle,
        map: &GridMap,
    ) -> Result<GridCellObservation, GridError> {
        let north = map.lookup(particle.x, particle.y)?;
        Ok(to_heading_frame(north, particle.heading))
    }

    /// Reweight one particle against a robot-frame `observation`.
    ///
    /// Returns the weight delta so the caller can keep its
    /// [`WeightAccumulator`] current.
    pub fn reweight(
        &self,
        particle: &mut Particle,
        map: &GridMap,
        observation: &GridCellObservation,
    ) -> Result<f64, GridError> {
        let old = particle.weight;
        if Self::predicted_view(particle, map)? == *observation {
            particle.weight += self.match_increment;
        }
        Ok(particle.weight - old)
    }

    /// Reweight every particle and feed the deltas into `weights`.
    ///
    /// Returns the number of particles whose view matched.
    pub fn update(
        &self,
        particles: &mut ParticleSet,
        map: &GridMap,
        observation: &GridCellObservation,
        weights: &mut WeightAccumulator,
    ) -> Result<usize, GridError> {
        let mut matched = 0;
        for particle in particles.iter_mut() {
            let delta = self.reweight(particle, map, observation)?;
            if delta != 0.0 {
                matched += 1;
            }
            weights.add(delta);
        }
        debug!(matched, total = weights.total(), "sensor update applied");
        Ok(matched)
    }
}
