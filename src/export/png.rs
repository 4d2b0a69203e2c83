//! PNG export functionality for normalized scalar grids.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::terrain::Grid;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid value range: min ({0}) >= max ({1})")]
    InvalidRange(f32, f32),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Value mapped to black.
    pub min_value: f32,
    /// Value mapped to white.
    pub max_value: f32,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options spanning the grid's own value range.
    pub fn auto_range(grid: &Grid<f32>) -> Self {
        let (min, max) = grid.value_range().unwrap_or((0.0, 1.0));
        Self {
            min_value: min,
            max_value: max,
            ..Default::default()
        }
    }
}

/// Exports a scalar grid as a 16-bit grayscale PNG.
///
/// Pixel `(x, y)` holds cell `(x, y)`; values outside the option range are clamped.
///
/// # Arguments
/// * `grid` - The grid to export, typically a normalized height or slope field
/// * `path` - Output file path
/// * `options` - Export options including the value range mapped to black/white
pub fn export_grid_png(
    grid: &Grid<f32>,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let min = options.min_value;
    let max = options.max_value;

    if !(min < max) {
        return Err(PngExportError::InvalidRange(min, max));
    }

    let (width, height) = grid.dimensions();
    let range = max - min;

    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);

    for ((x, y), &v) in grid.iter() {
        let normalized = ((v - min) / range).clamp(0.0, 1.0);
        let value = (normalized * 65535.0) as u16;
        img.put_pixel(x, y, Luma([value]));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    // Convert u16 slice to bytes for the encoder
    let raw_data = img.as_raw();
    let byte_slice: &[u8] = bytemuck::cast_slice(raw_data);

    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;

    Ok(())
}
