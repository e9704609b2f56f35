use glam::Vec2;
use itertools::Itertools;

use crate::{options::RunOptions, particle::Particle};

use super::tracker::Tracker;

/// Uniform-grid candidate lookup. Particles are binned by position once
/// per tick and a query reads the 3×3 cell block around its own cell.
///
/// The cell edge is the widest behaviour threshold plus `max_speed`:
/// the tick moves particles in place while the grid still holds their
/// start-of-tick cells, and one tick displaces a particle by at most
/// `max_speed`, so the padding keeps every true neighbour inside the
/// 3×3 block. Out-of-canvas positions clamp into the border cells.
pub struct GridTracker {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

impl GridTracker {
    fn cell_of(&self, position: Vec2) -> (usize, usize) {
        let col = (position.x / self.cell_size)
            .floor()
            .clamp(0., (self.cols - 1) as f32) as usize;
        let row = (position.y / self.cell_size)
            .floor()
            .clamp(0., (self.rows - 1) as f32) as usize;
        (col, row)
    }

    fn resize(&mut self, run_options: &RunOptions) {
        let cell_size = run_options.max_sensory_distance() + run_options.max_speed;
        let cols = (run_options.canvas.width / cell_size).ceil().max(1.) as usize;
        let rows = (run_options.canvas.height / cell_size).ceil().max(1.) as usize;

        if cell_size != self.cell_size || cols != self.cols || rows != self.rows {
            self.cell_size = cell_size;
            self.cols = cols;
            self.rows = rows;
            self.cells = vec![Vec::new(); cols * rows];
        }
    }
}

impl Tracker for GridTracker {
    fn new(run_options: &RunOptions) -> Self {
        let mut tracker = GridTracker {
            cell_size: 0.,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        tracker.resize(run_options);
        tracker
    }

    fn rebuild(&mut self, particles: &[Particle], run_options: &RunOptions) {
        self.resize(run_options);

        for cell in self.cells.iter_mut() {
            cell.clear();
        }

        for (i, particle) in particles.iter().enumerate() {
            let (col, row) = self.cell_of(particle.position);
            self.cells[row * self.cols + col].push(i);
        }
    }

    fn candidates(&self, position: Vec2, out: &mut Vec<usize>) {
        let (col, row) = self.cell_of(position);

        for (row_offset, col_offset) in (-1i64..=1).cartesian_product(-1i64..=1) {
            let r = row as i64 + row_offset;
            let c = col as i64 + col_offset;

            if r < 0 || c < 0 || r >= self.rows as i64 || c >= self.cols as i64 {
                continue;
            }

            out.extend_from_slice(&self.cells[r as usize * self.cols + c as usize]);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::GridTracker;
    use crate::math_helpers::distance;
    use crate::options::RunOptions;
    use crate::particle::Particle;
    use crate::swarm::naive_tracker::NaiveTracker;
    use crate::swarm::tracker::Tracker;

    fn scattered_particles(count: usize, run_options: &RunOptions) -> Vec<Particle> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(17);
        (0..count)
            .map(|id| {
                // deliberately overshoot the canvas on both sides
                let position = Vec2::new(
                    rng.gen::<f32>() * (run_options.canvas.width + 120.) - 60.,
                    rng.gen::<f32>() * (run_options.canvas.height + 120.) - 60.,
                );
                Particle::new(position, id, &mut rng, run_options)
            })
            .collect()
    }

    #[test]
    fn candidates_are_supersets_of_in_range_neighbours() {
        let run_options = RunOptions::default();
        let particles = scattered_particles(200, &run_options);

        let mut grid = GridTracker::new(&run_options);
        grid.rebuild(&particles, &run_options);

        let mut candidates = Vec::new();
        for particle in particles.iter() {
            candidates.clear();
            grid.candidates(particle.position, &mut candidates);

            for (j, other) in particles.iter().enumerate() {
                let d = distance(particle.position, other.position);
                if d < run_options.max_sensory_distance() {
                    assert!(
                        candidates.contains(&j),
                        "particle {} missing neighbour {} at distance {}",
                        particle.id,
                        j,
                        d
                    );
                }
            }
        }
    }

    #[test]
    fn candidates_never_duplicate() {
        let run_options = RunOptions::default();
        let particles = scattered_particles(120, &run_options);

        let mut grid = GridTracker::new(&run_options);
        grid.rebuild(&particles, &run_options);

        let mut candidates = Vec::new();
        grid.candidates(Vec2::new(400., 300.), &mut candidates);

        let mut deduped = candidates.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), candidates.len());
    }

    #[test]
    fn sorted_candidates_match_naive_order_filterwise() {
        let run_options = RunOptions::default();
        let particles = scattered_particles(80, &run_options);

        let mut grid = GridTracker::new(&run_options);
        grid.rebuild(&particles, &run_options);
        let mut naive = NaiveTracker::new(&run_options);
        naive.rebuild(&particles, &run_options);

        let probe = particles[40].position;

        let mut from_grid = Vec::new();
        grid.candidates(probe, &mut from_grid);
        from_grid.sort_unstable();
        from_grid.retain(|&j| distance(probe, particles[j].position) < run_options.max_sensory_distance());

        let mut from_naive = Vec::new();
        naive.candidates(probe, &mut from_naive);
        from_naive.retain(|&j| distance(probe, particles[j].position) < run_options.max_sensory_distance());

        assert_eq!(from_grid, from_naive);
    }
}
