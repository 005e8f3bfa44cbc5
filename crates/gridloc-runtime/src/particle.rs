//! Particle hypotheses and the fixed-size particle arena.

use gridloc_perception::GridMap;
use gridloc_types::{Heading, Pose};
use serde::{Deserialize, Serialize};

/// One pose hypothesis with its probability weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: usize,
    pub y: usize,
    pub heading: Heading,
    pub weight: f64,
}

impl Particle {
    pub fn new(x: usize, y: usize, heading: Heading, weight: f64) -> Self {
        Self {
            x,
            y,
            heading,
            weight,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.heading)
    }
}

/// Every (cell, heading) hypothesis of a grid, in one fixed-size arena.
///
/// The set holds exactly `width * height * 4` particles for its whole life.
/// Particles are moved and reweighted in place; nothing is ever added,
/// removed or resampled.  Iteration order is `x`, then `y`, then heading
/// (North, East, South, West), which is also the tie-break order used by
/// [`find_max`][crate::estimator::find_max].
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    width: usize,
    height: usize,
    particles: Box<[Particle]>,
}

impl ParticleSet {
    /// One particle per (cell, heading) of `map`, uniformly weighted.
    pub fn uniform(map: &GridMap) -> Self {
        let (width, height) = (map.width(), map.height());
        let weight = 1.0 / (width * height * Heading::ALL.len()) as f64;
        let particles = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .flat_map(|(x, y)| {
                Heading::ALL
                    .into_iter()
                    .map(move |h| Particle::new(x, y, h, weight))
            })
            .collect();
        Self {
            width,
            height,
            particles,
        }
    }

    /// Restore the initial enumeration and uniform weights.
    pub fn reset(&mut self) {
        let weight = 1.0 / self.particles.len() as f64;
        let mut slots = self.particles.iter_mut();
        for x in 0..self.width {
            for y in 0..self.height {
                for heading in Heading::ALL {
                    if let Some(p) = slots.next() {
                        *p = Particle::new(x, y, heading, weight);
                    }
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always `false`: a grid map has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Sum of all weights, recomputed from scratch.
    pub fn total_weight(&self) -> f64 {
        self.particles.iter().map(|p| p.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridloc_types::{Color, GridCellObservation};
    use std::collections::HashSet;

    fn map() -> GridMap {
        GridMap::filled(3, 5, GridCellObservation::uniform(Color::White)).unwrap()
    }

    #[test]
    fn uniform_covers_every_cell_and_heading_once() {
        let set = ParticleSet::uniform(&map());
        assert_eq!(set.len(), 60);
        let poses: HashSet<Pose> = set.iter().map(Particle::pose).collect();
        assert_eq!(poses.len(), 60);
        for p in set.iter() {
            assert!((p.weight - 1.0 / 60.0).abs() < 1e-12);
        }
        assert!((set.total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn iteration_order_is_x_then_y_then_heading() {
        let set = ParticleSet::uniform(&map());
        let first: Vec<Pose> = set.iter().take(5).map(Particle::pose).collect();
        assert_eq!(
            first,
            vec![
                Pose::new(0, 0, Heading::North),
                Pose::new(0, 0, Heading::East),
                Pose::new(0, 0, Heading::South),
                Pose::new(0, 0, Heading::West),
                Pose::new(0, 1, Heading::North),
            ]
        );
        assert_eq!(set.as_slice()[59].pose(), Pose::new(2, 4, Heading::West));
    }

    #[test]
    fn reset_restores_initial_state() {
        let fresh = ParticleSet::uniform(&map());
        let mut set = fresh.clone();
        for p in set.iter_mut() {
            p.x = 0;
            p.heading = Heading::South;
            p.weight = 0.5;
        }
        set.reset();
        assert_eq!(set, fresh);
    }
}
