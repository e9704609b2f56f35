use glam::f32::Vec2;
use rand::Rng;

use crate::{math_helpers::distance, options::RunOptions};

pub const LIFESPAN_MAX: f32 = 255.;

// attribute draw ranges, fixed once at creation
const SIZE_RANGE: (f32, f32) = (2., 5.);
const DECAY_RANGE: (f32, f32) = (0.2, 0.8);
const RED_RANGE: (f32, f32) = (180., 255.);
const GREEN_RANGE: (f32, f32) = (120., 220.);
const BLUE_RANGE: (f32, f32) = (200., 255.);
const OPACITY_RANGE: (f32, f32) = (150., 255.);

// targets closer than this produce no steer at all
const SEEK_EPSILON: f32 = 1.;

/// One flocking agent. Kinematics, the steering behaviours and the
/// lifespan state machine live here; population concerns (spawning,
/// attraction, removal) belong to [`crate::swarm::Swarm`].
///
/// `acceleration` is a transient accumulator: zero at the start of every
/// tick, folded into `velocity` and cleared again by [`Particle::update`].
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    // sequential id starting from 0, stable for the particle's lifetime
    pub id: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    acceleration: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    pub size: f32,
    /// r, g, b plus an opacity baseline, all in [0, 255]
    pub color: [f32; 4],
    /// drains while unattracted, regrows while attracted; [0, 255]
    pub lifespan: f32,
    pub decay: f32,
    /// owned by the swarm: recomputed from attractor proximity every tick
    pub is_attracted: bool,
}

impl Particle {
    pub fn new(position: Vec2, id: usize, rng: &mut impl Rng, run_options: &RunOptions) -> Self {
        let x_vel = (rng.gen::<f32>() * 2. - 1.) * run_options.max_speed;
        let y_vel = (rng.gen::<f32>() * 2. - 1.) * run_options.max_speed;
        let velocity = Vec2::new(x_vel, y_vel).clamp_length_max(run_options.max_speed);

        Particle {
            id,
            position,
            velocity,
            acceleration: Vec2::ZERO,
            max_speed: run_options.max_speed,
            max_force: run_options.max_force,
            size: rng.gen_range(SIZE_RANGE.0..SIZE_RANGE.1),
            color: [
                rng.gen_range(RED_RANGE.0..RED_RANGE.1),
                rng.gen_range(GREEN_RANGE.0..GREEN_RANGE.1),
                rng.gen_range(BLUE_RANGE.0..BLUE_RANGE.1),
                rng.gen_range(OPACITY_RANGE.0..OPACITY_RANGE.1),
            ],
            lifespan: LIFESPAN_MAX,
            decay: rng.gen_range(DECAY_RANGE.0..DECAY_RANGE.1),
            is_attracted: false,
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Steer towards `target`: desired velocity at full speed, minus the
    /// current velocity, clamped to `max_force`, then scaled by
    /// `strength`. Targets closer than [`SEEK_EPSILON`] yield no force.
    pub fn seek(&self, target: Vec2, strength: f32) -> Vec2 {
        let desired = target - self.position;

        if desired.length() < SEEK_EPSILON {
            return Vec2::ZERO;
        }

        let steer = desired.normalize() * self.max_speed - self.velocity;
        steer.clamp_length_max(self.max_force) * strength
    }

    /// Flee crowding neighbours: for every other particle strictly
    /// within `separation_distance`, accumulate a unit vector away from
    /// it weighted by 1/d, average, then steer along the average.
    pub fn separate(&self, others: &[&Particle], run_options: &RunOptions) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;

        for other in others {
            let d = distance(self.position, other.position);
            // d > 0 drops self and exact coincidences
            if d > 0. && d < run_options.separation_distance {
                let diff = (self.position - other.position).normalize() / d;
                sum += diff;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        sum /= count as f32;
        if sum.length() == 0. {
            return Vec2::ZERO;
        }

        let steer = sum.normalize() * self.max_speed - self.velocity;
        steer.clamp_length_max(self.max_force)
    }

    /// Match the average heading of neighbours strictly within
    /// `alignment_distance`.
    pub fn align(&self, others: &[&Particle], run_options: &RunOptions) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;

        for other in others {
            let d = distance(self.position, other.position);
            if d > 0. && d < run_options.alignment_distance {
                sum += other.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        sum /= count as f32;
        if sum.length() == 0. {
            return Vec2::ZERO;
        }

        let steer = sum.normalize() * self.max_speed - self.velocity;
        steer.clamp_length_max(self.max_force)
    }

    /// Drift towards the centre of mass of neighbours strictly within
    /// `cohesion_distance`, at half seek strength.
    pub fn cohesion(&self, others: &[&Particle], run_options: &RunOptions) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;

        for other in others {
            let d = distance(self.position, other.position);
            if d > 0. && d < run_options.cohesion_distance {
                sum += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        self.seek(sum / count as f32, 0.5)
    }

    /// Steer back into the interior when within `border_buffer` of a
    /// canvas edge. The horizontal axis is checked first and wins when
    /// both axes are violated; the desired vector keeps the untouched
    /// axis's current velocity component.
    pub fn borders(&self, run_options: &RunOptions) -> Vec2 {
        let width = run_options.canvas.width;
        let height = run_options.canvas.height;
        let buffer = run_options.border_buffer;

        let desired = if self.position.x < buffer {
            Some(Vec2::new(self.max_speed, self.velocity.y))
        } else if self.position.x > width - buffer {
            Some(Vec2::new(-self.max_speed, self.velocity.y))
        } else if self.position.y < buffer {
            Some(Vec2::new(self.velocity.x, self.max_speed))
        } else if self.position.y > height - buffer {
            Some(Vec2::new(self.velocity.x, -self.max_speed))
        } else {
            None
        };

        match desired {
            Some(desired) if desired.length() > 0. => {
                let steer = desired.normalize() * self.max_speed - self.velocity;
                steer.clamp_length_max(self.max_force)
            }
            _ => Vec2::ZERO,
        }
    }

    /// Fold the accumulated forces into the velocity, move, clear the
    /// accumulator, then advance the lifespan state: drain by `decay`
    /// while unattracted, regrow at twice that rate (capped) while
    /// attracted.
    pub fn update(&mut self) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.clamp_length_max(self.max_speed);
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;

        if self.is_attracted {
            self.lifespan = (self.lifespan + self.decay * 2.).min(LIFESPAN_MAX);
        } else {
            self.lifespan -= self.decay;
        }
    }

    pub fn is_dead(&self) -> bool {
        self.lifespan <= 0.
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use rstest::rstest;

    use super::{Particle, LIFESPAN_MAX};
    use crate::options::RunOptions;

    macro_rules! assert_eqf32 {
        ($x:expr, $y:expr) => {
            assert_relative_eq!($x, $y, epsilon = 1e-3_f32)
        };
    }

    fn test_particle(position: Vec2, velocity: Vec2) -> Particle {
        let run_options = RunOptions::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let mut particle = Particle::new(position, 0, &mut rng, &run_options);
        particle.velocity = velocity;
        particle
    }

    #[test]
    fn seek_at_own_position_is_zero() {
        let particle = test_particle(Vec2::new(120., 80.), Vec2::new(1., 1.));
        let force = particle.seek(particle.position, 1.);

        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn seek_points_towards_target() {
        let particle = test_particle(Vec2::new(0., 0.), Vec2::ZERO);
        let target = Vec2::new(100., 0.);

        let force = particle.seek(target, 1.);

        assert!(force.x > 0.);
        assert_eqf32!(force.y, 0.);
        assert!(force.length() <= particle.max_force + 1e-4);
    }

    #[test]
    fn seek_strength_scales_after_clamp() {
        let particle = test_particle(Vec2::new(0., 0.), Vec2::new(0., 2.));
        let target = Vec2::new(50., 30.);

        let unit = particle.seek(target, 1.);
        let double = particle.seek(target, 2.);

        assert_eqf32!(double.x, unit.x * 2.);
        assert_eqf32!(double.y, unit.y * 2.);
    }

    #[test]
    fn behaviours_with_no_neighbours_are_zero() {
        let run_options = RunOptions::default();
        let particle = test_particle(Vec2::new(400., 300.), Vec2::new(1., 0.));
        let others: Vec<&Particle> = Vec::new();

        assert_eq!(particle.separate(&others, &run_options), Vec2::ZERO);
        assert_eq!(particle.align(&others, &run_options), Vec2::ZERO);
        assert_eq!(particle.cohesion(&others, &run_options), Vec2::ZERO);
    }

    #[test]
    fn behaviours_ignore_coincident_neighbour() {
        let run_options = RunOptions::default();
        let particle = test_particle(Vec2::new(400., 300.), Vec2::new(1., 0.));
        let twin = test_particle(Vec2::new(400., 300.), Vec2::new(-1., 0.));
        let others = vec![&twin];

        assert_eq!(particle.separate(&others, &run_options), Vec2::ZERO);
        assert_eq!(particle.align(&others, &run_options), Vec2::ZERO);
        assert_eq!(particle.cohesion(&others, &run_options), Vec2::ZERO);
    }

    #[test]
    fn behaviours_ignore_out_of_range_neighbour() {
        let run_options = RunOptions::default();
        let particle = test_particle(Vec2::new(400., 300.), Vec2::new(1., 0.));
        let far = test_particle(Vec2::new(600., 300.), Vec2::new(0., 1.));
        let others = vec![&far];

        assert_eq!(particle.separate(&others, &run_options), Vec2::ZERO);
        assert_eq!(particle.align(&others, &run_options), Vec2::ZERO);
        assert_eq!(particle.cohesion(&others, &run_options), Vec2::ZERO);
    }

    #[test]
    fn separate_flees_close_neighbour() {
        let run_options = RunOptions::default();
        let particle = test_particle(Vec2::new(400., 300.), Vec2::ZERO);
        let neighbour = test_particle(Vec2::new(410., 300.), Vec2::ZERO);
        let others = vec![&neighbour];

        let force = particle.separate(&others, &run_options);

        assert!(force.x < 0.);
        assert_eqf32!(force.y, 0.);
    }

    #[rstest]
    #[case::separation(Vec2::new(410., 300.))]
    #[case::alignment(Vec2::new(440., 300.))]
    #[case::cohesion(Vec2::new(440., 300.))]
    fn forces_are_bounded_by_max_force(#[case] neighbour_position: Vec2) {
        let run_options = RunOptions::default();
        let particle = test_particle(Vec2::new(400., 300.), Vec2::new(3., -2.));
        let neighbour = test_particle(neighbour_position, Vec2::new(-3., 1.));
        let others = vec![&neighbour];

        for force in [
            particle.separate(&others, &run_options),
            particle.align(&others, &run_options),
            particle.cohesion(&others, &run_options),
            particle.borders(&run_options),
        ] {
            assert!(force.length() <= particle.max_force + 1e-4);
        }
    }

    #[test]
    fn align_matches_neighbour_heading() {
        let run_options = RunOptions::default();
        let particle = test_particle(Vec2::new(400., 300.), Vec2::ZERO);
        let neighbour = test_particle(Vec2::new(430., 300.), Vec2::new(0., 3.));
        let others = vec![&neighbour];

        let force = particle.align(&others, &run_options);

        assert_eqf32!(force.x, 0.);
        assert!(force.y > 0.);
    }

    #[rstest]
    #[case::left(Vec2::new(5., 300.), Vec2::new(-3., 0.))]
    #[case::right(Vec2::new(795., 300.), Vec2::new(3., 0.))]
    #[case::top(Vec2::new(400., 5.), Vec2::new(0., -3.))]
    #[case::bottom(Vec2::new(400., 595.), Vec2::new(0., 3.))]
    fn borders_pushes_back_inside(#[case] position: Vec2, #[case] velocity: Vec2) {
        let run_options = RunOptions::default();
        let particle = test_particle(position, velocity);

        let force = particle.borders(&run_options);
        let inward = Vec2::new(400., 300.) - position;

        assert!(force != Vec2::ZERO);
        assert!(force.dot(inward) > 0.);
    }

    #[test]
    fn borders_left_edge_pushes_right() {
        let run_options = RunOptions::default();
        let particle = test_particle(Vec2::new(5., 300.), Vec2::new(-3., 0.));

        let force = particle.borders(&run_options);

        assert!(force.x > 0.);
    }

    #[test]
    fn borders_zero_in_interior() {
        let run_options = RunOptions::default();
        let particle = test_particle(Vec2::new(400., 300.), Vec2::new(4., -4.));

        assert_eq!(particle.borders(&run_options), Vec2::ZERO);
    }

    #[test]
    fn borders_horizontal_axis_wins_in_corner() {
        let run_options = RunOptions::default();
        let particle = test_particle(Vec2::new(5., 5.), Vec2::ZERO);

        let force = particle.borders(&run_options);

        // the corner resolves through the x branch, so with no velocity
        // to preserve the steer is purely horizontal
        assert!(force.x > 0.);
        assert_eqf32!(force.y, 0.);
    }

    #[test]
    fn update_clamps_speed() {
        let mut particle = test_particle(Vec2::new(400., 300.), Vec2::ZERO);
        particle.apply_force(Vec2::new(100., 100.));

        particle.update();

        assert!(particle.velocity.length() <= particle.max_speed + 1e-4);
    }

    #[test]
    fn update_resets_acceleration() {
        let mut particle = test_particle(Vec2::new(400., 300.), Vec2::new(1., 0.));
        particle.apply_force(Vec2::new(0.1, 0.));

        particle.update();
        let velocity_after_first = particle.velocity;
        particle.update();

        // no new force was applied, so the accumulator must have been cleared
        assert_eq!(particle.velocity, velocity_after_first);
    }

    #[test]
    fn update_moves_by_velocity() {
        let mut particle = test_particle(Vec2::new(100., 100.), Vec2::new(2., -1.));

        particle.update();

        assert_eqf32!(particle.position.x, 102.);
        assert_eqf32!(particle.position.y, 99.);
    }

    #[test]
    fn lifespan_drains_while_unattracted() {
        let mut particle = test_particle(Vec2::new(400., 300.), Vec2::ZERO);
        particle.is_attracted = false;
        let before = particle.lifespan;

        particle.update();

        assert_eqf32!(particle.lifespan, before - particle.decay);
    }

    #[test]
    fn lifespan_regrows_at_twice_decay_while_attracted() {
        let mut particle = test_particle(Vec2::new(400., 300.), Vec2::ZERO);
        particle.is_attracted = true;
        particle.lifespan = 100.;

        particle.update();

        assert_eqf32!(particle.lifespan, 100. + particle.decay * 2.);
    }

    #[test]
    fn lifespan_regrowth_caps_at_max() {
        let mut particle = test_particle(Vec2::new(400., 300.), Vec2::ZERO);
        particle.is_attracted = true;
        particle.lifespan = LIFESPAN_MAX - 0.1;
        particle.decay = 0.7;

        particle.update();

        assert_eqf32!(particle.lifespan, LIFESPAN_MAX);
    }

    #[test]
    fn dies_the_tick_lifespan_runs_out() {
        let mut particle = test_particle(Vec2::new(400., 300.), Vec2::ZERO);
        particle.lifespan = 0.1;
        particle.decay = 0.5;

        assert!(!particle.is_dead());
        particle.update();
        assert!(particle.is_dead());
    }

    #[test]
    fn new_particle_attributes_within_ranges() {
        let run_options = RunOptions::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);

        for id in 0..64 {
            let particle = Particle::new(Vec2::new(1., 1.), id, &mut rng, &run_options);

            assert!(particle.size >= 2. && particle.size < 5.);
            assert!(particle.decay > 0.);
            assert_eqf32!(particle.lifespan, LIFESPAN_MAX);
            assert!(particle.velocity.length() <= run_options.max_speed + 1e-4);
            for channel in particle.color {
                assert!((0. ..=255.).contains(&channel));
            }
            assert!(!particle.is_attracted);
        }
    }
}
