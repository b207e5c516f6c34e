//! 4x4 transformation matrix stored as four row vectors.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec4`
//! - Translation is stored in the **last column** (the `w` of each row)
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! # Example
//! ```ignore
//! let transform = Mat4::translate(offset) * Mat4::scale(size);  // scale first
//! let moved = transform.transform_point(vertex);
//! ```

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use super::to_radians;
use super::vec3::Vec3;
use super::vec4::Vec4;

/// Row-major 4x4 matrix.
///
/// Equality compares all sixteen scalars exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    rows: [Vec4; 4],
}

impl Mat4 {
    pub const fn new(r1: Vec4, r2: Vec4, r3: Vec4, r4: Vec4) -> Self {
        Mat4 {
            rows: [r1, r2, r3, r4],
        }
    }

    /// Build a matrix from `data[row][col]`.
    pub const fn from_rows(data: [[f32; 4]; 4]) -> Self {
        let [a, b, c, d] = data;
        Mat4::new(
            Vec4::new(a[0], a[1], a[2], a[3]),
            Vec4::new(b[0], b[1], b[2], b[3]),
            Vec4::new(c[0], c[1], c[2], c[3]),
            Vec4::new(d[0], d[1], d[2], d[3]),
        )
    }

    pub const fn identity() -> Self {
        Mat4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    pub fn translate(v: Vec3) -> Self {
        Mat4::from_rows([
            [1.0, 0.0, 0.0, v.x],
            [0.0, 1.0, 0.0, v.y],
            [0.0, 0.0, 1.0, v.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scale(v: Vec3) -> Self {
        Mat4::from_rows([
            [v.x, 0.0, 0.0, 0.0],
            [0.0, v.y, 0.0, 0.0],
            [0.0, 0.0, v.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation of `degrees` about `axis` (Rodrigues' formula).
    ///
    /// `axis` is expected to be unit length; it is not normalized here.
    /// Positive angles rotate counter-clockwise when looking down the axis
    /// toward the origin.
    pub fn rotate(axis: Vec3, degrees: f32) -> Self {
        let r = to_radians(degrees);
        let c = r.cos();
        let s = r.sin();
        let Vec3 { x, y, z } = axis;
        let (x2, y2, z2) = (x * x, y * y, z * z);
        let t = 1.0 - c;
        Mat4::from_rows([
            [x2 + (1.0 - x2) * c, x * y * t - z * s, x * z * t + y * s, 0.0],
            [x * y * t + z * s, y2 + (1.0 - y2) * c, y * z * t - x * s, 0.0],
            [x * z * t - y * s, y * z * t + x * s, z2 + (1.0 - z2) * c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn transpose(&self) -> Self {
        let [r1, r2, r3, r4] = self.rows;
        Mat4::new(
            Vec4::new(r1.x, r2.x, r3.x, r4.x),
            Vec4::new(r1.y, r2.y, r3.y, r4.y),
            Vec4::new(r1.z, r2.z, r3.z, r4.z),
            Vec4::new(r1.w, r2.w, r3.w, r4.w),
        )
    }

    /// Transform a point: `self * (p, 1)` followed by the perspective divide.
    ///
    /// The divide is unconditional, so a resulting `w` of zero produces
    /// infinite or NaN components.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        let p = *self * Vec4::from_vec3(point);
        Vec3::new(p.x / p.w, p.y / p.w, p.z / p.w)
    }

    /// Transform a direction with the upper-left 3x3 block only, ignoring
    /// translation.
    pub fn transform_direction(&self, v: Vec3) -> Vec3 {
        let [r1, r2, r3, _] = self.rows;
        Vec3::new(r1.dot3(v), r2.dot3(v), r3.dot3(v))
    }

    /// Row `index` (0..4).
    ///
    /// # Panics
    /// Panics if `index >= 4`.
    #[inline]
    pub fn row(&self, index: usize) -> Vec4 {
        self.rows[index]
    }

    pub fn rows(&self) -> [Vec4; 4] {
        self.rows
    }

    /// Access element at [row][col].
    ///
    /// # Panics
    /// Panics if `row` or `col` is 4 or more.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        let r = self.rows[row];
        match col {
            0 => r.x,
            1 => r.y,
            2 => r.z,
            3 => r.w,
            _ => panic!("column index out of range: {col}"),
        }
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// Each entry is the dot product of a row of `self` with a column of `rhs`,
/// summed in x, y, z, w order.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let columns = rhs.transpose().rows;
        let row = |r: Vec4| {
            Vec4::new(
                r.dot(columns[0]),
                r.dot(columns[1]),
                r.dot(columns[2]),
                r.dot(columns[3]),
            )
        };
        let [r1, r2, r3, r4] = self.rows;
        Mat4::new(row(r1), row(r2), row(r3), row(r4))
    }
}

/// Transform a Vec4 by a matrix: each output component is a row dot `v`.
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let [r1, r2, r3, r4] = self.rows;
        Vec4::new(r1.dot(v), r2.dot(v), r3.dot(v), r4.dot(v))
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl UlpsEq for Mat4 {
    fn default_max_ulps() -> u32 {
        f32::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.ulps_eq(b, epsilon, max_ulps))
    }
}
