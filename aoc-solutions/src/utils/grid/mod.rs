//! Grid propagation: beams that split downward and rolls peeled by neighbour count.
//!
//! Both simulations read an [`Array2<Tile>`] produced by [`parse_grid`] and
//! never modify it; any per-run state (beam multiplicities, degrees, removed
//! flags) lives inside the simulation.

pub mod beam;
pub mod cascade;

use ndarray::Array2;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    /// `.`
    Empty,
    /// `^`
    Splitter,
    /// `S`
    Start,
    /// `@`
    Roll,
}

impl Tile {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Tile::Empty),
            '^' => Some(Tile::Splitter),
            'S' => Some(Tile::Start),
            '@' => Some(Tile::Roll),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, ch: char },
    #[error("grid has no start tile")]
    MissingStart,
}

/// Parse one row per line; surrounding blank lines and per-line whitespace are ignored.
///
/// ```
/// use aoc_solutions::utils::grid::{parse_grid, Tile};
///
/// let grid = parse_grid(".S.\n.^.\n").unwrap();
/// assert_eq!(grid.dim(), (2, 3));
/// assert_eq!(grid[[1, 1]], Tile::Splitter);
/// ```
pub fn parse_grid(input: &str) -> Result<Array2<Tile>, GridError> {
    let mut rows: Vec<Vec<Tile>> = Vec::new();
    for (row, line) in input.trim().lines().map(str::trim).enumerate() {
        let tiles = line
            .chars()
            .enumerate()
            .map(|(col, ch)| Tile::from_char(ch).ok_or(GridError::UnknownTile { row, col, ch }))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = rows.first() {
            if tiles.len() != first.len() {
                return Err(GridError::RaggedRow {
                    row,
                    expected: first.len(),
                    found: tiles.len(),
                });
            }
        }
        rows.push(tiles);
    }

    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        return Err(GridError::Empty);
    }
    Ok(Array2::from_shape_fn((rows.len(), width), |(r, c)| rows[r][c]))
}

/// In-bounds 8-neighbours of `pos` in a grid of shape `(rows, cols)`
pub fn neighbors8(
    (rows, cols): (usize, usize),
    (row, col): (usize, usize),
) -> impl Iterator<Item = (usize, usize)> {
    const OFFSETS: [(isize, isize); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    OFFSETS.into_iter().filter_map(move |(dr, dc)| {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < rows && c < cols).then_some((r, c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grid_trims_lines() {
        let grid = parse_grid("\n  ..@  \n  S^.\n\n").unwrap();
        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid[[0, 2]], Tile::Roll);
        assert_eq!(grid[[1, 0]], Tile::Start);
    }

    #[test]
    fn test_parse_grid_errors() {
        assert_eq!(parse_grid(""), Err(GridError::Empty));
        assert_eq!(parse_grid("  \n "), Err(GridError::Empty));
        assert_eq!(
            parse_grid("...\n..\n"),
            Err(GridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            parse_grid("..\n.#"),
            Err(GridError::UnknownTile {
                row: 1,
                col: 1,
                ch: '#'
            })
        );
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        let corner: Vec<_> = neighbors8((3, 3), (0, 0)).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(neighbors8((3, 3), (1, 1)).count(), 8);
        assert_eq!(neighbors8((1, 1), (0, 0)).count(), 0);
    }
}
