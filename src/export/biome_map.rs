//! Biome preview map export.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};
use thiserror::Error;

use crate::biomes::Biome;
use crate::terrain::Grid;

/// Errors that can occur during biome map export.
#[derive(Error, Debug)]
pub enum BiomeMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Options for biome map export.
#[derive(Debug, Clone)]
pub struct BiomeMapOptions {
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for BiomeMapOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Export a biome grid as an RGB PNG using each biome's preview color.
pub fn export_biome_map_png(
    biomes: &Grid<Biome>,
    path: &Path,
    options: &BiomeMapOptions,
) -> Result<(), BiomeMapError> {
    let (width, height) = biomes.dimensions();
    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);

    for ((x, y), biome) in biomes.iter() {
        img.put_pixel(x, y, Rgb(biome.preview_rgb()));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn export_biome_map_smoke() {
        let biomes = Grid::from_fn(16, 8, |x, _| if x < 8 { Biome::Water } else { Biome::Snow });

        let dir = tempdir().unwrap();
        let path = dir.path().join("texture.png");
        export_biome_map_png(&biomes, &path, &BiomeMapOptions::default()).unwrap();
        assert!(path.exists());

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (16, 8));
        assert_eq!(img.get_pixel(0, 0).0, Biome::Water.preview_rgb());
        assert_eq!(img.get_pixel(15, 7).0, Biome::Snow.preview_rgb());
    }
}
