//! Export module for saving terrain layers to files.
//!
//! Scalar layers in [0, 1] are written as 16-bit grayscale PNG, the biome
//! layer as an RGB PNG preview, and the mesh as Wavefront OBJ.

mod png;
mod biome_map;
mod obj;

pub use png::{export_grid_png, PngExportError, PngExportOptions};
pub use biome_map::{export_biome_map_png, BiomeMapError, BiomeMapOptions};
pub use obj::{export_obj, write_obj, ObjExportError};
