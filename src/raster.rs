//! Procedural raster synthesis and PNG export.
//!
//! The exporter draws a fixed color gradient and writes it as an 8-bit RGB,
//! non-interlaced PNG with default compression and filtering.
//!
//! # Resource lifetime
//!
//! Every resource an export touches is owned by the export call: the file,
//! the buffered writer on top of it and the encoder on top of that. They are
//! dropped in reverse order of acquisition on every return path. If encoding
//! fails after the file was created, the partial file is removed.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageResult, Rgb, RgbImage};
use tracing::{debug, warn};

use crate::error::{ExportError, ExportResult};

/// Width and height of the exported gradient.
pub const DEFAULT_SIZE: u32 = 512;

/// Raster export settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
        }
    }
}

impl ExportOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Synthesize the gradient at these dimensions and write it to `path`.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> ExportResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        write_png(path, &gradient(self.width, self.height))
    }
}

/// Write the default 512x512 gradient to `path`.
pub fn write_gradient_png<P: AsRef<Path>>(path: P) -> ExportResult<()> {
    ExportOptions::default().export(path)
}

/// Color of the gradient at `column`, `row`.
///
/// ```text
/// R = 255 * column / width
/// G = 255 * row / width
/// B = 255 * (row + column) / (width + height)
/// ```
///
/// Each channel is floored. Green is scaled by the width, not the height, so
/// on rasters taller than they are wide it saturates at 255.
pub fn gradient_pixel(column: u32, row: u32, width: u32, height: u32) -> Rgb<u8> {
    let channel = |numerator: u64, denominator: u32| {
        (255 * numerator / u64::from(denominator)).min(255) as u8
    };
    let (column, row) = (u64::from(column), u64::from(row));
    Rgb([
        channel(column, width),
        channel(row, width),
        channel(row + column, width + height),
    ])
}

/// Build the gradient raster. Both dimensions must be non-zero.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |column, row| {
        gradient_pixel(column, row, width, height)
    })
}

/// Encode `raster` as an RGB8 PNG at `path`.
pub fn write_png<P: AsRef<Path>>(path: P, raster: &RgbImage) -> ExportResult<()> {
    let path = path.as_ref();
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::InvalidSize { width, height });
    }

    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut guard = PartialFile::new(path);
    let mut writer = BufWriter::new(file);

    encode(&mut writer, raster)
        .and_then(|()| writer.flush().map_err(Into::into))
        .map_err(|source| ExportError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

    guard.keep();
    debug!("Wrote {}x{} PNG to {}", width, height, path.display());
    Ok(())
}

fn encode<W: Write>(writer: W, raster: &RgbImage) -> ImageResult<()> {
    let encoder =
        PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(
        raster.as_raw(),
        raster.width(),
        raster.height(),
        ExtendedColorType::Rgb8,
    )
}

/// Deletes the file at `path` on drop unless [`PartialFile::keep`] was called.
///
/// Must be created after the file and before any writer wrapping it, so the
/// writer is closed by the time the file is removed.
struct PartialFile<'a> {
    path: &'a Path,
    keep: bool,
}

impl<'a> PartialFile<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, keep: false }
    }

    fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if !self.keep && fs::remove_file(self.path).is_ok() {
            warn!("Removed incomplete image {}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_by_two_gradient() {
        let img = gradient(2, 2);
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(1, 1), Rgb([127, 127, 127]));
        assert_eq!(*img.get_pixel(1, 0), Rgb([127, 0, 63]));
        assert_eq!(*img.get_pixel(0, 1), Rgb([0, 127, 63]));
    }

    #[test]
    fn test_default_gradient_corners() {
        let img = gradient(DEFAULT_SIZE, DEFAULT_SIZE);
        assert_eq!(img.dimensions(), (512, 512));
        assert_eq!(*img.get_pixel(511, 0), Rgb([254, 0, 127]));
        assert_eq!(*img.get_pixel(0, 511), Rgb([0, 254, 127]));
        assert_eq!(*img.get_pixel(511, 511), Rgb([254, 254, 254]));
    }

    #[test]
    fn test_green_scales_by_width() {
        // 2 wide, 4 tall: green keeps growing past the width and saturates.
        assert_eq!(gradient_pixel(0, 1, 2, 4).0[1], 127);
        assert_eq!(gradient_pixel(0, 2, 2, 4).0[1], 255);
        assert_eq!(gradient_pixel(0, 3, 2, 4).0[1], 255);
    }

    #[test]
    fn test_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        write_gradient_png(&path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.color(), image::ColorType::Rgb8);
        let img = img.to_rgb8();
        assert_eq!(img, gradient(DEFAULT_SIZE, DEFAULT_SIZE));
    }

    #[test]
    fn test_write_png_custom_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        ExportOptions::new(3, 2).export(&path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(*img.get_pixel(2, 1), gradient_pixel(2, 1, 3, 2));
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let err = write_gradient_png(&path).unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_raster_rejected_before_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let err = ExportOptions::new(0, 4).export(&path).unwrap_err();
        assert!(matches!(
            err,
            ExportError::InvalidSize {
                width: 0,
                height: 4
            }
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_partial_file_removed_unless_kept() {
        let dir = tempfile::tempdir().unwrap();
        let dropped = dir.path().join("dropped.png");
        let kept = dir.path().join("kept.png");
        fs::write(&dropped, b"partial").unwrap();
        fs::write(&kept, b"complete").unwrap();

        drop(PartialFile::new(&dropped));
        let mut guard = PartialFile::new(&kept);
        guard.keep();
        drop(guard);

        assert!(!dropped.exists());
        assert!(kept.exists());
    }
}
