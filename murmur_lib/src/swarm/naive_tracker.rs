use glam::Vec2;

use crate::{options::RunOptions, particle::Particle};

use super::tracker::Tracker;

/// The baseline candidate set: the entire population, every time.
/// Each behaviour then pays the O(n) distance scan itself, which is the
/// deliberate O(n²)-per-tick simplicity tradeoff at populations in the
/// hundreds.
pub struct NaiveTracker {
    len: usize,
}

impl Tracker for NaiveTracker {
    fn new(_: &RunOptions) -> Self {
        NaiveTracker { len: 0 }
    }

    fn rebuild(&mut self, particles: &[Particle], _: &RunOptions) {
        self.len = particles.len();
    }

    fn candidates(&self, _: Vec2, out: &mut Vec<usize>) {
        out.extend(0..self.len);
    }
}
