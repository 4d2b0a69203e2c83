//! Generic two-dimensional grid used for every per-cell terrain layer.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A `width` x `height` grid of cells.
///
/// Cells are stored row-major with `x` selecting the row, so the cell at
/// `(x, y)` lives at index `x * height + y`. This matches the vertex ordering
/// of the terrain mesh, which lets mesh and grid layers share indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid by evaluating `f(x, y)` for every cell in storage order.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> T,
    {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for x in 0..width {
            for y in 0..height {
                cells.push(f(x, y));
            }
        }
        Self { width, height, cells }
    }

    /// Wraps existing row-major cells. Returns `None` if the length does not
    /// match `width * height`.
    pub fn from_cells(width: u32, height: u32, cells: Vec<T>) -> Option<Self> {
        if cells.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, cells })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Storage index of `(x, y)`, or `None` when the coordinate is outside the grid.
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(x as usize * self.height as usize + y as usize)
        } else {
            None
        }
    }

    /// Grid coordinate of a storage index.
    pub fn coord(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.cells.len() {
            return None;
        }
        let h = self.height as usize;
        Some(((index / h) as u32, (index % h) as u32))
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Sets the cell at `(x, y)`. Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: T) -> bool {
        match self.get_mut(x, y) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Cell values in storage order.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }

    /// All cells sharing the given `x`, ordered by `y`.
    pub fn row(&self, x: u32) -> Option<&[T]> {
        if x >= self.width {
            return None;
        }
        let h = self.height as usize;
        let start = x as usize * h;
        Some(&self.cells[start..start + h])
    }

    /// Iterates over `((x, y), &value)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32), &T)> + '_ {
        let h = self.height as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| (((i / h) as u32, (i % h) as u32), v))
    }

    /// Builds a new grid of the same shape by mapping every cell.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// True if `other` has the same width and height.
    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl<T: Clone> Grid<T> {
    /// A grid with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width as usize * height as usize],
        }
    }
}

impl<T: Send> Grid<T> {
    /// Parallel counterpart of [`Grid::from_fn`]. Cells may be evaluated in any
    /// order; the result is identical to the sequential constructor.
    pub fn par_from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> T + Sync + Send,
    {
        let h = height as usize;
        let len = width as usize * h;
        let cells = (0..len)
            .into_par_iter()
            .map(|i| f((i / h) as u32, (i % h) as u32))
            .collect();
        Self { width, height, cells }
    }
}

impl<T: Sync> Grid<T> {
    /// Parallel counterpart of [`Grid::map`].
    pub fn par_map<U, F>(&self, f: F) -> Grid<U>
    where
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.par_iter().map(f).collect(),
        }
    }
}

impl Grid<f32> {
    /// Returns `(min, max)` over all cells, or `None` for an empty grid.
    ///
    /// Computed as a parallel reduction; min/max are commutative and
    /// associative so the result does not depend on evaluation order.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        if self.cells.is_empty() {
            return None;
        }
        let range = self
            .cells
            .par_iter()
            .fold(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(lo, hi), &v| (lo.min(v), hi.max(v)),
            )
            .reduce(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)),
            );
        Some(range)
    }
}
