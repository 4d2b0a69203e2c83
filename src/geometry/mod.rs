//! Planar grid geometry: neighborhood lookups on a bounded `width` x `height` grid.

pub mod neighbors;

pub use neighbors::{neighbor_8, offset_in_bounds, MOORE_OFFSETS};
