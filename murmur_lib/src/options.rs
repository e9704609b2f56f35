use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// target population size, the tick loop replenishes up to this
    pub max_particles: usize,

    pub max_speed: f32,
    pub max_force: f32,

    pub separation_coefficient: f32,
    pub alignment_coefficient: f32,
    pub cohesion_coefficient: f32,
    pub border_coefficient: f32,

    pub separation_distance: f32,
    pub alignment_distance: f32,
    pub cohesion_distance: f32,

    /// attractors further than this are ignored outright
    pub attraction_radius: f32,
    /// pull strength at distance zero
    pub attraction_strength_near: f32,
    /// pull strength at the edge of the attraction radius
    pub attraction_strength_far: f32,

    /// distance from a canvas edge at which the border steer kicks in
    pub border_buffer: f32,

    pub canvas: CanvasSize,
    pub tracker_type: TrackerType,
    pub save_options: SaveOptions,

    pub sample_rate: u64,
    /// fixed seed for reproducible runs, None draws one from entropy
    pub seed: Option<u64>,
}

impl RunOptions {
    /// The widest of the three behaviour thresholds; anything further
    /// away can never influence a particle within a single tick.
    pub fn max_sensory_distance(&self) -> f32 {
        self.separation_distance
            .max(self.alignment_distance.max(self.cohesion_distance))
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        let max_particles = 550;
        let init_width = 800;
        let init_height = 600;

        let max_speed = 4.0;
        let max_force = 0.2;

        let separation_coefficient = 1.5;
        let alignment_coefficient = 1.0;
        let cohesion_coefficient = 1.0;
        let border_coefficient = 1.5;

        let separation_distance = 25.;
        let alignment_distance = 50.;
        let cohesion_distance = 50.;

        let attraction_radius = 150.;
        let attraction_strength_near = 2.5;
        let attraction_strength_far = 0.5;

        let border_buffer = 50.;

        RunOptions {
            max_particles,
            max_speed,
            max_force,
            separation_coefficient,
            alignment_coefficient,
            cohesion_coefficient,
            border_coefficient,
            separation_distance,
            alignment_distance,
            cohesion_distance,
            attraction_radius,
            attraction_strength_near,
            attraction_strength_far,
            border_buffer,
            canvas: self::get_canvas_size(init_width, init_height),
            tracker_type: TrackerType::Naive,
            save_options: SaveOptions {
                save_locations: false,
                save_locations_path: Some("./".to_owned()),
                save_locations_timestamp: true,
            },
            sample_rate: 1,
            seed: None,
        }
    }
}

pub fn get_canvas_size(init_width: u32, init_height: u32) -> CanvasSize {
    CanvasSize {
        width: init_width as f32,
        height: init_height as f32,
    }
}

/// Canvas pixel space: x grows right, y grows down, origin top-left.
/// Attractor points arrive in this space and particle positions live in it.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
// {"type": "SpatGrid"}
pub enum TrackerType {
    Naive,
    SpatGrid,
}

#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub save_locations: bool,
    pub save_locations_path: Option<String>,
    pub save_locations_timestamp: bool,
}
