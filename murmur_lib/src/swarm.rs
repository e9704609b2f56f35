use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::math_helpers::{distance, map_range};
use crate::options::{RunOptions, TrackerType};
use crate::particle::Particle;

use self::grid_tracker::GridTracker;
use self::naive_tracker::NaiveTracker;
use self::tracker::Tracker;

pub mod grid_tracker;
pub mod naive_tracker;
pub mod tracker;

enum AnyTracker {
    Naive(NaiveTracker),
    Grid(GridTracker),
}

impl AnyTracker {
    fn rebuild(&mut self, particles: &[Particle], run_options: &RunOptions) {
        match self {
            AnyTracker::Naive(tracker) => tracker.rebuild(particles, run_options),
            AnyTracker::Grid(tracker) => tracker.rebuild(particles, run_options),
        }
    }

    fn candidates(&self, position: Vec2, out: &mut Vec<usize>) {
        match self {
            AnyTracker::Naive(tracker) => tracker.candidates(position, out),
            AnyTracker::Grid(tracker) => tracker.candidates(position, out),
        }
    }
}

/// The whole flock: owns the particle population, the current tick's
/// attractor snapshot and the RNG every random draw goes through.
///
/// The driver calls `set_attractors`, `update` and reads `view` once
/// per tick, strictly in that order; nothing here suspends or is safe
/// to re-enter mid-tick.
pub struct Swarm {
    particles: Vec<Particle>,
    attractors: Vec<Vec2>,
    tracker: AnyTracker,
    rng: Xoshiro256PlusPlus,
    next_id: usize,
}

impl Swarm {
    pub fn new(run_options: &RunOptions) -> Self {
        let seed = run_options
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());

        let tracker = match run_options.tracker_type {
            TrackerType::Naive => AnyTracker::Naive(NaiveTracker::new(run_options)),
            TrackerType::SpatGrid => AnyTracker::Grid(GridTracker::new(run_options)),
        };

        let mut swarm = Swarm {
            particles: Vec::with_capacity(run_options.max_particles),
            attractors: Vec::new(),
            tracker,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            next_id: 0,
        };
        swarm.replenish(run_options);

        swarm
    }

    /// Spawn one particle at a uniformly random canvas position.
    pub fn add_particle(&mut self, run_options: &RunOptions) {
        let position = Vec2::new(
            self.rng.gen::<f32>() * run_options.canvas.width,
            self.rng.gen::<f32>() * run_options.canvas.height,
        );
        let particle = Particle::new(position, self.next_id, &mut self.rng, run_options);
        self.next_id += 1;

        self.particles.push(particle);
    }

    /// Wholesale replacement of the attractor snapshot for the coming
    /// tick. The list may be empty; points are opaque canvas-space
    /// coordinates and input order is meaningful only for tie-breaks.
    pub fn set_attractors(&mut self, points: Vec<Vec2>) {
        self.attractors = points;
    }

    /// One simulation tick.
    ///
    /// Replenishes up to `max_particles` first, so particles that died
    /// last tick are replaced before anything moves. Then every
    /// particle gets the four flocking forces plus, when an attractor
    /// sits within range, a distance-weighted pull towards the closest
    /// one, and is advanced. Particles that die during the pass are
    /// invisible to every later neighbour scan in the same pass and are
    /// compacted out at the end, which leaves the same trajectories as
    /// removing them on the spot without mutating the list mid-scan.
    pub fn update(&mut self, run_options: &RunOptions) {
        self.replenish(run_options);
        self.tracker.rebuild(&self.particles, run_options);

        let mut candidates: Vec<usize> = Vec::with_capacity(self.particles.len());

        for i in (0..self.particles.len()).rev() {
            candidates.clear();
            self.tracker
                .candidates(self.particles[i].position, &mut candidates);
            // tracker-independent accumulation order
            candidates.sort_unstable();

            let (separation, alignment, cohesion, borders, attraction) = {
                let particle = &self.particles[i];
                let neighbours: Vec<&Particle> = candidates
                    .iter()
                    .map(|&j| &self.particles[j])
                    .filter(|other| !other.is_dead())
                    .collect();

                (
                    particle.separate(&neighbours, run_options) * run_options.separation_coefficient,
                    particle.align(&neighbours, run_options) * run_options.alignment_coefficient,
                    particle.cohesion(&neighbours, run_options) * run_options.cohesion_coefficient,
                    particle.borders(run_options) * run_options.border_coefficient,
                    self.attraction(particle, run_options),
                )
            };

            let particle = &mut self.particles[i];
            particle.apply_force(separation);
            particle.apply_force(alignment);
            particle.apply_force(cohesion);
            particle.apply_force(borders);

            particle.is_attracted = false;
            if let Some(force) = attraction {
                particle.apply_force(force);
                particle.is_attracted = true;
            }

            particle.update();
        }

        self.particles.retain(|particle| !particle.is_dead());
    }

    /// The pull towards the closest attractor strictly within
    /// `attraction_radius`, or None when no attractor qualifies.
    /// Equidistant attractors resolve to the earliest one in the input
    /// list; strength falls off linearly from `attraction_strength_near`
    /// at distance zero to `attraction_strength_far` at the radius.
    fn attraction(&self, particle: &Particle, run_options: &RunOptions) -> Option<Vec2> {
        let mut closest: Option<(Vec2, f32)> = None;

        for point in self.attractors.iter() {
            let d = distance(particle.position, *point);
            if d >= run_options.attraction_radius {
                continue;
            }
            match closest {
                Some((_, best)) if d >= best => (),
                _ => closest = Some((*point, d)),
            }
        }

        closest.map(|(point, d)| {
            let strength = map_range(
                d,
                0.,
                run_options.attraction_radius,
                run_options.attraction_strength_near,
                run_options.attraction_strength_far,
            );
            particle.seek(point, strength)
        })
    }

    fn replenish(&mut self, run_options: &RunOptions) {
        while self.particles.len() < run_options.max_particles {
            self.add_particle(run_options);
        }
    }

    /// Read access for the rendering collaborator: position, size,
    /// color and lifespan (as opacity) per surviving particle.
    pub fn view(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn attractors(&self) -> &[Vec2] {
        &self.attractors
    }

    /// Throw the population away and refill it, picking up whatever
    /// `max_particles` now says.
    pub fn restart(&mut self, run_options: &RunOptions) {
        self.particles.clear();
        self.replenish(run_options);
    }
}
