use glam::Vec2;

pub fn distance(p1: Vec2, p2: Vec2) -> f32 {
    distance_sq(p1, p2).sqrt()
}

pub fn distance_sq(p1: Vec2, p2: Vec2) -> f32 {
    (p1.x - p2.x).powi(2) + (p1.y - p2.y).powi(2)
}

/// Linearly re-maps `value` from [`in_start`, `in_end`] onto
/// [`out_start`, `out_end`]. The output range may be inverted, which is
/// how the attraction falloff turns a small distance into a large pull.
/// No clamping is applied.
#[inline]
pub fn map_range(value: f32, in_start: f32, in_end: f32, out_start: f32, out_end: f32) -> f32 {
    out_start + (out_end - out_start) * ((value - in_start) / (in_end - in_start))
}
