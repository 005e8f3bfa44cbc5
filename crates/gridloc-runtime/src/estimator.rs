//! Weight normalization and maximum-a-posteriori pose extraction.
//!
//! The running total of all particle weights is owned by a
//! [`WeightAccumulator`].  The sensor model reports each weight change as a
//! delta, so normalization never has to re-sum the set:
//!
//! ```rust
//! use gridloc_perception::GridMap;
//! use gridloc_runtime::estimator::{WeightAccumulator, find_max};
//! use gridloc_runtime::particle::ParticleSet;
//! use gridloc_types::{Color, GridCellObservation};
//!
//! let map = GridMap::filled(1, 1, GridCellObservation::uniform(Color::White)).unwrap();
//! let mut particles = ParticleSet::uniform(&map);
//! let mut weights = WeightAccumulator::new();
//!
//! // Boost the first particle by 1.0 and record the delta.
//! if let Some(p) = particles.iter_mut().next() {
//!     p.weight += 1.0;
//! }
//! weights.add(1.0);
//!
//! weights.normalize(&mut particles);
//! assert!((particles.total_weight() - 1.0).abs() < 1e-9);
//! let best = find_max(&particles).unwrap();
//! assert!((best.weight - 0.625).abs() < 1e-9);
//! ```

use gridloc_types::Pose;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::particle::ParticleSet;

/// The best hypothesis after a normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate {
    pub pose: Pose,
    pub weight: f64,
}

/// Running total of particle weights.
///
/// Starts at `1.0`, the sum of a freshly initialized uniform set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightAccumulator {
    total: f64,
}

impl Default for WeightAccumulator {
    fn default() -> Self {
        Self { total: 1.0 }
    }
}

impl WeightAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change of `delta` in one particle's weight.
    pub fn add(&mut self, delta: f64) {
        self.total += delta;
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Back to the total of a normalized set.
    pub fn reset(&mut self) {
        self.total = 1.0;
    }

    /// Divide every weight by the accumulated total so the set sums to one,
    /// then reset the total to `1.0`.
    ///
    /// Call exactly once per filter iteration, after all sensor updates and
    /// before [`find_max`].
    pub fn normalize(&mut self, particles: &mut ParticleSet) {
        let total = self.total;
        if total > 0.0 && total.is_finite() {
            for p in particles.iter_mut() {
                p.weight /= total;
            }
        } else {
            warn!(total, "weight total is degenerate; skipping normalization");
        }
        self.reset();
    }
}

/// Linear scan for the particle with the greatest weight.
///
/// Only a strictly greater weight replaces the current best, so ties resolve
/// to the first particle in iteration order (`x`, then `y`, then heading).
/// Returns `None` only for an empty set, which a [`ParticleSet`] built from a
/// valid map never is.
pub fn find_max(particles: &ParticleSet) -> Option<PoseEstimate> {
    let best = particles.iter().reduce(|best, p| if p.weight > best.weight { p } else { best })?;
    Some(PoseEstimate {
        pose: best.pose(),
        weight: best.weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridloc_perception::GridMap;
    use gridloc_types::{Color, GridCellObservation, Heading};

    fn set() -> ParticleSet {
        let map = GridMap::filled(3, 5, GridCellObservation::uniform(Color::White)).unwrap();
        ParticleSet::uniform(&map)
    }

    #[test]
    fn normalize_makes_weights_sum_to_one() {
        let mut particles = set();
        let mut weights = WeightAccumulator::new();
        for (i, p) in particles.iter_mut().enumerate() {
            if i % 7 == 0 {
                p.weight += 0.9;
                weights.add(0.9);
            }
        }
        weights.normalize(&mut particles);
        assert!((particles.total_weight() - 1.0).abs() < 1e-9);
        assert!((weights.total() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_with_no_updates_is_noop() {
        let mut particles = set();
        let before = particles.clone();
        WeightAccumulator::new().normalize(&mut particles);
        assert_eq!(particles, before);
    }

    #[test]
    fn normalize_skips_degenerate_total() {
        let mut particles = set();
        let before = particles.clone();
        let mut weights = WeightAccumulator::new();
        weights.add(-1.0);
        weights.normalize(&mut particles);
        assert_eq!(particles, before);
        assert!((weights.total() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn find_max_picks_heaviest_particle() {
        let mut particles = set();
        if let Some(p) = particles.iter_mut().nth(22) {
            p.weight = 0.5;
        }
        let best = find_max(&particles).unwrap();
        assert_eq!(best.pose, particles.as_slice()[22].pose());
        assert!((best.weight - 0.5).abs() < 1e-12);
    }

    #[test]
    fn find_max_ties_resolve_to_first_in_iteration_order() {
        let mut particles = set();
        for i in [40, 13, 27] {
            if let Some(p) = particles.iter_mut().nth(i) {
                p.weight = 0.3;
            }
        }
        assert_eq!(find_max(&particles).unwrap().pose, particles.as_slice()[13].pose());

        // A fully uniform set resolves to the very first particle.
        let uniform = set();
        assert_eq!(find_max(&uniform).unwrap().pose, Pose::new(0, 0, Heading::North));
    }
}
