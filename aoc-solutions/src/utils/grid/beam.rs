//! Downward beams that fan out at splitters.
//!
//! Every beam advances one row per round. All active beams therefore share a
//! row, and the round's state is just `column -> multiplicity`. A beam that
//! moves onto a splitter is replaced by two beams on the same row, one column
//! to each side; beams that land on the same column in a round merge.
//!
//! A beam spawned beside a splitter does not interact with the tile it is
//! spawned on; only the tile it moves onto next round matters.

use std::collections::BTreeMap;

use ndarray::Array2;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use super::{GridError, Tile};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BeamReport {
    /// Splitter activations, counted once per occupied column per round no
    /// matter how many beams were merged into it
    pub splits: u64,
    /// Total multiplicity that left through the bottom edge
    pub exited: BigUint,
    /// Total multiplicity a split pushed past the left or right edge
    pub lost: BigUint,
}

/// Run from the first [`Tile::Start`] in row-major order.
///
/// ```
/// use aoc_solutions::utils::grid::{beam, parse_grid};
///
/// let grid = parse_grid(".S.\n.^.\n...").unwrap();
/// let report = beam::simulate(&grid).unwrap();
/// assert_eq!(report.splits, 1);
/// assert_eq!(report.exited, 2u32.into());
/// ```
pub fn simulate(grid: &Array2<Tile>) -> Result<BeamReport, GridError> {
    Ok(simulate_from(grid, find_start(grid)?))
}

/// Position of the first [`Tile::Start`] in row-major order
pub fn find_start(grid: &Array2<Tile>) -> Result<(usize, usize), GridError> {
    grid.indexed_iter()
        .find(|&(_, &tile)| tile == Tile::Start)
        .map(|(pos, _)| pos)
        .ok_or(GridError::MissingStart)
}

/// Run with a single beam of multiplicity 1 at `start`.
///
/// The start tile itself is never evaluated; the first move is onto the row below.
pub fn simulate_from(grid: &Array2<Tile>, (start_row, start_col): (usize, usize)) -> BeamReport {
    let (rows, cols) = grid.dim();
    let mut report = BeamReport::default();
    let mut active: BTreeMap<usize, BigUint> = BTreeMap::from([(start_col, BigUint::from(1u32))]);
    let mut row = start_row;

    while !active.is_empty() {
        let next_row = row + 1;
        if next_row >= rows {
            report.exited += active.into_values().sum::<BigUint>();
            break;
        }

        let mut next: BTreeMap<usize, BigUint> = BTreeMap::new();
        for (col, count) in active {
            if col >= cols {
                report.lost += count;
                continue;
            }
            if grid[[next_row, col]] != Tile::Splitter {
                *next.entry(col).or_insert_with(BigUint::zero) += count;
                continue;
            }

            report.splits += 1;
            match col.checked_sub(1) {
                Some(left) => *next.entry(left).or_insert_with(BigUint::zero) += &count,
                None => report.lost += &count,
            }
            if col + 1 < cols {
                *next.entry(col + 1).or_insert_with(BigUint::zero) += count;
            } else {
                report.lost += count;
            }
        }

        active = next;
        row = next_row;
    }

    debug!(
        splits = report.splits,
        rows_travelled = row.saturating_sub(start_row),
        "beam simulation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid::parse_grid;

    const EXAMPLE: &str = "\
.......S.......
...............
.......^.......
...............
......^.^......
...............
.....^.^.^.....
...............
....^.^...^....
...............
...^.^...^.^...
...............
..^...^.....^..
...............
.^.^.^.^.^...^.
...............";

    fn run(input: &str) -> BeamReport {
        simulate(&parse_grid(input).unwrap()).unwrap()
    }

    #[test]
    fn test_example_counts() {
        let report = run(EXAMPLE);
        assert_eq!(report.splits, 21);
        assert_eq!(report.exited, BigUint::from(40u32));
        assert!(report.lost.is_zero());
    }

    #[test]
    fn test_single_splitter_below_start() {
        let report = run("..S..\n..^..\n.....");
        assert_eq!(report.splits, 1);
        assert_eq!(report.exited, BigUint::from(2u32));
    }

    #[test]
    fn test_merged_beams_split_once() {
        // Both halves of the first split hit splitters; their inner halves
        // merge in the middle column with multiplicity 2.
        let report = run("..S..\n..^..\n.^.^.\n.....");
        assert_eq!(report.splits, 3);
        assert_eq!(report.exited, BigUint::from(4u32));
    }

    #[test]
    fn test_spawned_beam_ignores_splitter_it_lands_on() {
        let report = run("..S..\n..^^.\n.....");
        assert_eq!(report.splits, 1);
        assert_eq!(report.exited, BigUint::from(2u32));
    }

    #[test]
    fn test_split_at_edge_loses_one_side() {
        let report = run("S..\n^..\n...");
        assert_eq!(report.splits, 1);
        assert_eq!(report.exited, BigUint::from(1u32));
        assert_eq!(report.lost, BigUint::from(1u32));
    }

    #[test]
    fn test_start_on_last_row_exits_immediately() {
        let report = run("...\n.S.");
        assert_eq!(report.splits, 0);
        assert_eq!(report.exited, BigUint::from(1u32));
    }

    #[test]
    fn test_missing_start_is_an_error() {
        let grid = parse_grid("...\n.^.").unwrap();
        assert_eq!(simulate(&grid), Err(GridError::MissingStart));
    }

    #[test]
    fn test_multiplicity_grows_without_overflow() {
        // Alternating splitter rows double the timelines every two rows
        let mut rows = vec![format!("{}S{}", ".".repeat(70), ".".repeat(70))];
        for depth in 0..70 {
            rows.push(
                (0..141)
                    .map(|c| {
                        let offset = (c as i64 - 70).abs();
                        if offset <= depth && (offset - depth) % 2 == 0 { '^' } else { '.' }
                    })
                    .collect(),
            );
            rows.push(".".repeat(141));
        }
        let report = run(&rows.join("\n"));
        assert!(report.lost.is_zero());
        assert!(report.exited > BigUint::from(u64::MAX));
    }
}
