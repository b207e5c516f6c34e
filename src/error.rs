//! Error types for mesh loading and image export.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh loading.
pub type MeshResult<T> = Result<T, MeshError>;

/// Result type for image export.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while loading a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8 text.
    #[error("{path} is not valid UTF-8 text")]
    Utf8 { path: PathBuf },

    /// A vertex record with fewer than three numeric fields.
    #[error("line {line}: vertex record needs 3 coordinates, found {found}")]
    MalformedVertex { line: usize, found: usize },

    /// A face record with fewer than three integer fields.
    #[error("line {line}: face record needs 3 vertex indices, found {found}")]
    MalformedFace { line: usize, found: usize },

    /// A face refers to a vertex that does not exist. `index` is one-based,
    /// as written in the file.
    #[error("line {line}: face refers to vertex {index} but the mesh has {vertex_count} vertices")]
    DanglingIndex {
        line: usize,
        index: i64,
        vertex_count: usize,
    },

    /// OBJ loading failed.
    #[error("failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),
}

/// Errors that can occur while writing an image file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination file could not be created.
    #[error("unable to open {path} for writing: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The codec failed while encoding or flushing the image.
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Raster dimensions that the codec cannot represent.
    #[error("invalid raster size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}
