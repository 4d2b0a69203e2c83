//! Triangle mesh construction from a normalized heightfield.
//!
//! Vertices follow the grid's storage order (`index = x * height + y`). Each
//! unit quad with corners a=(x,y), b=(x,y+1), c=(x+1,y+1), d=(x+1,y) is split
//! along the a-c diagonal into triangles (a,b,c) and (a,c,d). With the grid's
//! y axis mapped to world z, this winding gives every face an upward (+Y)
//! right-handed normal.

mod config;

pub use config::MeshConfig;

use glam::Vec3;
use log::debug;
use rayon::prelude::*;

use crate::terrain::Grid;

/// Vertices, triangles and wireframe edges of a terrain surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub vertices: Vec<Vec3>,
    /// Vertex index pairs; five per grid quad.
    pub edges: Vec<[u32; 2]>,
    /// Vertex index triples; two per grid quad.
    pub triangles: Vec<[u32; 3]>,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Unnormalized geometric normal of triangle `i`, following its winding.
    pub fn face_normal(&self, i: usize) -> Option<Vec3> {
        let [a, b, c] = *self.triangles.get(i)?;
        let (a, b, c) = (
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        );
        Some((b - a).cross(c - a))
    }
}

/// Number of triangles produced for a `width` x `height` grid.
pub fn triangle_count(width: u32, height: u32) -> usize {
    2 * quad_count(width, height)
}

/// Number of edges produced for a `width` x `height` grid.
pub fn edge_count(width: u32, height: u32) -> usize {
    5 * quad_count(width, height)
}

fn quad_count(width: u32, height: u32) -> usize {
    width.saturating_sub(1) as usize * height.saturating_sub(1) as usize
}

/// Computes one vertex per cell: `base + (step_x * x, height_scale * h, step_y * y)`.
pub fn build_vertices(heights: &Grid<f32>, cfg: &MeshConfig) -> Vec<Vec3> {
    let (step_x, step_y) = cfg.steps(heights.width(), heights.height());
    let base = cfg.base();

    let rows = heights.height() as usize;

    heights
        .cells()
        .par_iter()
        .enumerate()
        .map(|(i, &h)| {
            let (x, y) = ((i / rows) as f32, (i % rows) as f32);
            base + Vec3::new(step_x * x, cfg.height_scale * h, step_y * y)
        })
        .collect()
}

/// Builds the edge and triangle index lists for a `width` x `height` grid.
///
/// Returns `(edges, triangles)`.
pub fn triangulate(width: u32, height: u32) -> (Vec<[u32; 2]>, Vec<[u32; 3]>) {
    let mut edges = Vec::with_capacity(edge_count(width, height));
    let mut triangles = Vec::with_capacity(triangle_count(width, height));

    for x in 0..width.saturating_sub(1) {
        for y in 0..height.saturating_sub(1) {
            let a = x * height + y;
            let b = a + 1;
            let c = a + height + 1;
            let d = a + height;

            edges.extend_from_slice(&[[a, b], [b, c], [c, a], [c, d], [d, a]]);
            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        }
    }

    (edges, triangles)
}

/// Builds the complete mesh for a heightfield.
pub fn build_mesh(heights: &Grid<f32>, cfg: &MeshConfig) -> TerrainMesh {
    let vertices = build_vertices(heights, cfg);
    let (edges, triangles) = triangulate(heights.width(), heights.height());
    debug!(
        "mesh: {} vertices, {} triangles, {} edges",
        vertices.len(),
        triangles.len(),
        edges.len()
    );

    TerrainMesh {
        vertices,
        edges,
        triangles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_count_and_bounds() {
        for (w, h) in [(2, 2), (3, 5), (7, 4), (16, 16)] {
            let (edges, tris) = triangulate(w, h);
            let n = w * h;
            assert_eq!(tris.len(), 2 * (w as usize - 1) * (h as usize - 1));
            assert_eq!(tris.len(), triangle_count(w, h));
            assert_eq!(edges.len(), edge_count(w, h));
            assert!(tris.iter().flatten().all(|&i| i < n));
            assert!(edges.iter().flatten().all(|&i| i < n));
        }
    }

    #[test]
    fn test_single_quad_layout() {
        // 2x3 grid: a=(0,0)=0, b=(0,1)=1, c=(1,1)=4, d=(1,0)=3
        let (edges, tris) = triangulate(2, 3);
        assert_eq!(tris[0], [0, 1, 4]);
        assert_eq!(tris[1], [0, 4, 3]);
        assert_eq!(&edges[..5], &[[0, 1], [1, 4], [4, 0], [4, 3], [3, 0]]);
    }

    #[test]
    fn test_degenerate_grid_has_no_triangles() {
        let (edges, tris) = triangulate(1, 10);
        assert!(edges.is_empty());
        assert!(tris.is_empty());
    }

    #[test]
    fn test_vertex_layout() {
        let heights = Grid::from_fn(4, 3, |x, y| (x + y) as f32 / 5.0);
        let cfg = MeshConfig::default();
        let verts = build_vertices(&heights, &cfg);
        assert_eq!(verts.len(), 12);

        // First and last vertices sit on the footprint corners.
        assert_eq!(verts[0], Vec3::new(-1.0, -0.75, -1.0));
        let last = verts[11];
        assert!((last.x - 1.0).abs() < 1e-6);
        assert!((last.z - 1.0).abs() < 1e-6);
        assert!((last.y - (-0.75 + 0.5)).abs() < 1e-6);

        // For fixed y, x strictly increases with grid x.
        for y in 0..3 {
            for x in 1..4 {
                let prev = verts[heights.index(x - 1, y).unwrap()];
                let cur = verts[heights.index(x, y).unwrap()];
                assert!(cur.x > prev.x);
                assert_eq!(cur.z, prev.z);
            }
        }
    }

    #[test]
    fn test_winding_is_consistent() {
        let heights = Grid::filled(5, 4, 0.3f32);
        let mesh = build_mesh(&heights, &MeshConfig::default());
        assert_eq!(mesh.vertex_count(), 20);
        for i in 0..mesh.triangle_count() {
            let n = mesh.face_normal(i).unwrap();
            assert!(n.y > 0.0, "triangle {} faces down: {:?}", i, n);
        }
    }

    #[test]
    fn test_height_scale_applies() {
        let heights = Grid::filled(2, 2, 1.0f32);
        let cfg = MeshConfig {
            base: [0.0, 0.0, 0.0],
            size: 10.0,
            height_scale: 3.0,
        };
        let verts = build_vertices(&heights, &cfg);
        assert!(verts.iter().all(|v| v.y == 3.0));
        assert_eq!(verts[3], Vec3::new(10.0, 3.0, 10.0));
    }
}
