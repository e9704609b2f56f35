use std::f32::consts::TAU;

use glam::Vec2;
use murmur_lib::options::CanvasSize;

/// Stand-in for the face-tracking input: an animated face-shaped point
/// cloud in canvas space. The swarm treats these points exactly like
/// live landmarks, so swapping a real tracker in changes nothing
/// downstream.
pub struct SyntheticFace {
    center: Vec2,
    scale: f32,
}

impl SyntheticFace {
    const OUTLINE_POINTS: usize = 12;
    const MOUTH_POINTS: usize = 5;
    /// ticks per full sway cycle
    const SWAY_PERIOD: f32 = 240.;

    pub fn new(canvas: CanvasSize) -> Self {
        SyntheticFace {
            center: Vec2::new(canvas.width / 2., canvas.height / 2.),
            scale: canvas.width.min(canvas.height) / 4.,
        }
    }

    /// Landmark set for the given tick: face outline, two eyes and a
    /// mouth arc, swaying slowly so attraction has something to track.
    pub fn points(&self, tick: u64) -> Vec<Vec2> {
        let phase = tick as f32 * TAU / Self::SWAY_PERIOD;
        let center =
            self.center + Vec2::new(phase.cos(), (phase * 2.).sin() * 0.5) * self.scale * 0.15;

        let mut points = Vec::with_capacity(Self::OUTLINE_POINTS + Self::MOUTH_POINTS + 2);

        // outline, slightly narrower than tall
        for i in 0..Self::OUTLINE_POINTS {
            let angle = i as f32 * TAU / Self::OUTLINE_POINTS as f32;
            points.push(center + Vec2::new(angle.cos() * 0.8, angle.sin()) * self.scale);
        }

        // eyes sit above the centre line (y grows downward)
        let eye_offset = Vec2::new(0.35, -0.35) * self.scale;
        points.push(center + Vec2::new(-eye_offset.x, eye_offset.y));
        points.push(center + Vec2::new(eye_offset.x, eye_offset.y));

        // mouth arc, opening and closing out of step with the sway
        let mouth_open = 0.15 + 0.1 * (phase * 3.).sin().abs();
        for i in 0..Self::MOUTH_POINTS {
            let t = i as f32 / (Self::MOUTH_POINTS - 1) as f32 * 2. - 1.;
            points.push(center + Vec2::new(t * 0.4, 0.45 + (1. - t * t) * mouth_open) * self.scale);
        }

        points
    }
}
