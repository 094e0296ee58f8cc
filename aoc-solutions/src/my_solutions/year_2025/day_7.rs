use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use ndarray::Array2;

use crate::utils::grid::beam::{self, BeamReport};
use crate::utils::grid::{GridError, Tile, parse_grid};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 7, tags = ["2025", "grid", "beam"])]
pub struct Solver;

#[derive(Debug)]
pub struct SharedData {
    grid: Array2<Tile>,
    start: (usize, usize),
    report: Option<BeamReport>,
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = parse_grid(input).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        let start = beam::find_start(&grid).map_err(|e| match e {
            GridError::MissingStart => ParseError::MissingData("start tile 'S'".to_string()),
            other => ParseError::InvalidFormat(other.to_string()),
        })?;
        Ok(SharedData {
            grid,
            start,
            report: None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(simulate_once_for_both(shared).splits.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(simulate_once_for_both(shared).exited.to_string())
    }
}

fn simulate_once_for_both(shared: &mut SharedData) -> &BeamReport {
    shared
        .report
        .get_or_insert_with(|| beam::simulate_from(&shared.grid, shared.start))
}
