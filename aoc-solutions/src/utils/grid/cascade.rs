//! Removal cascade over rolls with few roll neighbours.

use std::collections::VecDeque;

use ndarray::Array2;
use tracing::debug;

use super::{Tile, neighbors8};

/// A roll with fewer roll neighbours than this can be removed
pub const ACCESS_THRESHOLD: u8 = 4;

fn degrees(grid: &Array2<Tile>) -> Array2<u8> {
    Array2::from_shape_fn(grid.dim(), |pos| {
        neighbors8(grid.dim(), pos)
            .filter(|&n| grid[n] == Tile::Roll)
            .count() as u8
    })
}

/// Rolls that can be removed right now
pub fn accessible(grid: &Array2<Tile>) -> usize {
    let degree = degrees(grid);
    grid.indexed_iter()
        .filter(|&(pos, &tile)| tile == Tile::Roll && degree[pos] < ACCESS_THRESHOLD)
        .count()
}

/// Remove accessible rolls until none are left and return how many went.
///
/// Each removal lowers its neighbours' degrees. A roll is queued once: at the
/// start if it is already accessible, otherwise when its degree falls to
/// exactly `ACCESS_THRESHOLD - 1`.
pub fn peel(grid: &Array2<Tile>) -> usize {
    let mut degree = degrees(grid);
    let mut present = grid.mapv(|tile| tile == Tile::Roll);

    let mut queue: VecDeque<(usize, usize)> = present
        .indexed_iter()
        .filter(|&(pos, &roll)| roll && degree[pos] < ACCESS_THRESHOLD)
        .map(|(pos, _)| pos)
        .collect();
    let initial = queue.len();

    let mut removed = 0;
    while let Some(pos) = queue.pop_front() {
        if !present[pos] {
            continue;
        }
        present[pos] = false;
        removed += 1;

        for n in neighbors8(grid.dim(), pos) {
            if !present[n] {
                continue;
            }
            degree[n] -= 1;
            if degree[n] == ACCESS_THRESHOLD - 1 {
                queue.push_back(n);
            }
        }
    }

    debug!(initial, removed, "roll cascade finished");
    removed
}
