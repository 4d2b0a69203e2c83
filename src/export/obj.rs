//! Wavefront OBJ export for terrain meshes.
//!
//! Faces are written with 1-based indices and with the winding reversed
//! relative to [`TerrainMesh::triangles`], so a stored `(a, b, c)` becomes
//! `f c b a`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::mesh::TerrainMesh;

/// Errors that can occur during OBJ export.
#[derive(Error, Debug)]
pub enum ObjExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `mesh` as OBJ text to `writer`.
pub fn write_obj<W: Write>(mesh: &TerrainMesh, mut writer: W) -> Result<(), ObjExportError> {
    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for &[a, b, c] in &mesh.triangles {
        writeln!(writer, "f {} {} {}", c + 1, b + 1, a + 1)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `mesh` to an OBJ file at `path`.
pub fn export_obj(mesh: &TerrainMesh, path: &Path) -> Result<(), ObjExportError> {
    let file = File::create(path)?;
    write_obj(mesh, BufWriter::new(file))
}
