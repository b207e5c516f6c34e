//! Numeric and I/O groundwork for a CPU renderer.
//!
//! This crate provides the pieces a rendering pipeline is built on:
//! vector and matrix algebra, a loader for simple text meshes, and a PNG
//! exporter for procedurally generated rasters.
//!
//! # Quick Start
//!
//! ```ignore
//! use raylang::prelude::*;
//!
//! let mesh = Mesh::load("model.smf")?;
//! let moved = mesh.transformed(&Mat4::translate(Vec3::new(0.0, 0.0, 5.0)));
//! raster::write_gradient_png("gradient.png")?;
//! ```

pub mod error;
pub mod face;
pub mod math;
pub mod mesh;
pub mod raster;

// Re-export commonly needed types at crate root for convenience
pub use error::{ExportError, ExportResult, MeshError, MeshResult};
pub use face::Face;
pub use mesh::Mesh;
pub use raster::ExportOptions;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use raylang::prelude::*;
/// ```
pub mod prelude {
    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;
    pub use crate::math::{clamp, to_radians};

    // Geometry
    pub use crate::face::Face;
    pub use crate::mesh::Mesh;

    // Export
    pub use crate::raster::{self, ExportOptions};

    // Errors
    pub use crate::error::{ExportError, MeshError};
}
