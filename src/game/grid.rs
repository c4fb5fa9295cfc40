//! Board geometry: pure functions over coordinates, no drawing or input.

use std::collections::HashSet;

use rand::Rng;

use super::action::Direction;
use super::state::Coordinate;

/// `head` moved one cell in `direction`. Not clamped to the board; an
/// off-board result is how the caller detects a wall hit.
pub fn next_head(head: Coordinate, direction: Direction, cell_size: i32) -> Coordinate {
    let (dx, dy) = direction.delta();
    head.moved_by(dx * cell_size, dy * cell_size)
}

pub fn is_out_of_bounds(c: Coordinate, width: i32, height: i32) -> bool {
    c.x < 0 || c.x >= width || c.y < 0 || c.y >= height
}

/// True if `new_head` lands on any of `body`. The caller passes the body
/// without the new head itself.
pub fn is_self_collision<'a>(
    new_head: Coordinate,
    body: impl IntoIterator<Item = &'a Coordinate>,
) -> bool {
    body.into_iter().any(|segment| *segment == new_head)
}

/// Rejection-sample a grid-aligned cell that is not in `occupied`.
///
/// Loops until it finds a free cell, so `occupied` must leave at least one
/// cell of the board empty.
pub fn place_food<R: Rng + ?Sized>(
    occupied: &HashSet<Coordinate>,
    width: i32,
    height: i32,
    cell_size: i32,
    rng: &mut R,
) -> Coordinate {
    let columns = width / cell_size;
    let rows = height / cell_size;
    loop {
        let x = rng.gen_range(0..columns) * cell_size;
        let y = rng.gen_range(0..rows) * cell_size;
        let candidate = Coordinate::new(x, y);

        if !occupied.contains(&candidate) {
            return candidate;
        }
    }
}
