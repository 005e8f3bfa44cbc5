//! Motion model: the filter's prediction step.
//!
//! Every particle advances one cell along its heading, exactly as the robot
//! does after each road segment.  A particle that would leave the grid
//! bounces instead: its heading is reversed and the advance is taken from the
//! pre-advance position.  Motion is noiseless and never changes a weight.

use gridloc_perception::GridMap;

use crate::particle::{Particle, ParticleSet};

/// Advance one particle by one cell, bouncing off the grid boundary.
///
/// On a grid that is one cell wide along the direction of travel the reversed
/// advance leaves the grid too; the particle then keeps its cell and only
/// turns around.
pub fn advance(particle: Particle, map: &GridMap) -> Particle {
    let (x, y) = (particle.x as i64, particle.y as i64);
    let (dx, dy) = particle.heading.step();

    if map.contains(x + dx, y + dy) {
        return Particle {
            x: (x + dx) as usize,
            y: (y + dy) as usize,
            ..particle
        };
    }

    let heading = particle.heading.reverse();
    let (bx, by) = (x - dx, y - dy);
    if map.contains(bx, by) {
        Particle {
            x: bx as usize,
            y: by as usize,
            heading,
            ..particle
        }
    } else {
        Particle { heading, ..particle }
    }
}

/// Apply [`advance`] to every particle in the set.
pub fn advance_all(particles: &mut ParticleSet, map: &GridMap) {
    for particle in particles.iter_mut() {
        *particle = advance(*particle, map);
    }
}
