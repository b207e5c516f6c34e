//! Vector and matrix algebra.
//!
//! All types are small `Copy` values. Equality (`==`) is exact component-wise
//! comparison with no tolerance; use the [`approx`] traits implemented on each
//! type when a tolerance is wanted.

pub mod mat4;
pub mod vec3;
pub mod vec4;

pub use mat4::Mat4;
pub use vec3::Vec3;
pub use vec4::Vec4;

/// Convert degrees to radians.
#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    std::f32::consts::PI * degrees / 180.0
}

/// Clamp `value` into `[lower, upper]`.
///
/// Unlike [`f32::clamp`] this never panics when `lower > upper`; the lower
/// bound wins.
#[inline]
pub fn clamp(value: f32, lower: f32, upper: f32) -> f32 {
    value.min(upper).max(lower)
}
