//! 2D vector math.
//!
//! Positions, velocities and forces are all plain `nalgebra` vectors; this module only adds the
//! handful of helpers the engine needs on top.

pub type Vec2 = nalgebra::Vector2<f64>;

/// Shorthand constructor.
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// Euclidean length of `v`, never smaller than `floor`.
///
/// Coincident nodes produce a zero displacement; clamping the length keeps the direction
/// division finite.
pub fn clamped_norm(v: &Vec2, floor: f64) -> f64 {
    v.norm().max(floor)
}
