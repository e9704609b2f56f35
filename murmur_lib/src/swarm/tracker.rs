use glam::Vec2;

use crate::{options::RunOptions, particle::Particle};

/// Candidate lookup for the neighbour behaviours.
///
/// A tracker answers "which particles could be neighbours of this
/// position" with indices into the population slice it was last rebuilt
/// from. Candidate sets must be supersets of every particle strictly
/// within [`RunOptions::max_sensory_distance`] of the queried position;
/// the behaviours re-check exact distances against live positions, so
/// any two trackers produce identical trajectories.
pub trait Tracker {
    fn new(run_options: &RunOptions) -> Self
    where
        Self: Sized;

    /// Re-index the population at the start of a tick.
    fn rebuild(&mut self, particles: &[Particle], run_options: &RunOptions);

    /// Push candidate indices for `position` into `out`. May contain
    /// the queried particle itself and particles far out of range;
    /// never skips one in range.
    fn candidates(&self, position: Vec2, out: &mut Vec<usize>);
}
