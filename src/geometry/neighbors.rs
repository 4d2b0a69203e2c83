//! Bounds-checked neighbor lookups on a bounded grid.
//!
//! The grid does not wrap: cells past an edge simply do not exist, so border
//! cells have fewer than eight neighbors.

/// Offsets of the Moore neighborhood, the eight compass directions around a cell.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Returns the neighbor of `(x, y)` at offset `(dx, dy)`, or `None` if it lies
/// outside the `width` x `height` grid.
pub fn offset_in_bounds(width: u32, height: u32, x: u32, y: u32, dx: i32, dy: i32) -> Option<(u32, u32)> {
    let nx = x as i64 + dx as i64;
    let ny = y as i64 + dy as i64;

    if (0..width as i64).contains(&nx) && (0..height as i64).contains(&ny) {
        Some((nx as u32, ny as u32))
    } else {
        None
    }
}

/// Iterates over the in-bounds Moore neighbors of `(x, y)`.
pub fn neighbor_8(width: u32, height: u32, x: u32, y: u32) -> impl Iterator<Item = (u32, u32)> {
    MOORE_OFFSETS
        .into_iter()
        .filter_map(move |(dx, dy)| offset_in_bounds(width, height, x, y, dx, dy))
}
