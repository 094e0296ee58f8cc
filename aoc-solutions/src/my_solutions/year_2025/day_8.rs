use anyhow::{Context, anyhow};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::disjoint_set::{
    WeightedPair, connect_first, connect_until_single, pairs_by_weight, squared_distance,
};

/// Connections made in part 1 for the full puzzle input
const CONNECTIONS: usize = 1000;
/// Inputs this small are the worked example, which only makes `n / 2` connections
const EXAMPLE_SIZE_LIMIT: usize = 20;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 8, tags = ["2025", "union-find"])]
pub struct Solver;

#[derive(Debug)]
pub struct SharedData {
    points: Vec<[i64; 3]>,
    pairs: Option<Vec<WeightedPair<i64>>>,
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .trim()
            .lines()
            .enumerate()
            .map(|(line_idx, line)| parse_point(line).with_context(|| format!("line {}", line_idx + 1)))
            .collect::<Result<Vec<_>, anyhow::Error>>()
            .map(|points| SharedData {
                points,
                pairs: None,
            })
            .map_err(|e| ParseError::InvalidFormat(format!("{e:#}")))
    }
}

fn parse_point(line: &str) -> anyhow::Result<[i64; 3]> {
    let mut coords = line.trim().split(',').map(|v| v.trim().parse::<i64>());
    let point = [
        coords.next().ok_or_else(|| anyhow!("missing x"))??,
        coords.next().ok_or_else(|| anyhow!("missing y"))??,
        coords.next().ok_or_else(|| anyhow!("missing z"))??,
    ];
    if coords.next().is_some() {
        return Err(anyhow!("expected exactly three coordinates in {line:?}"));
    }
    Ok(point)
}

fn sorted_pairs(shared: &mut SharedData) -> &[WeightedPair<i64>] {
    shared
        .pairs
        .get_or_insert_with(|| pairs_by_weight(&shared.points, |a, b| squared_distance(*a, *b)))
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let n = shared.points.len();
        let connections = if n > EXAMPLE_SIZE_LIMIT {
            CONNECTIONS
        } else {
            n / 2
        };

        let circuits = connect_first(n, sorted_pairs(shared), connections);
        let mut sizes = circuits.component_sizes();
        sizes.sort_unstable_by(|a, b| b.cmp(a));

        // Missing circuits count as 1 so small inputs still have a product
        let product: u64 = (0..3)
            .map(|i| sizes.get(i).copied().unwrap_or(1) as u64)
            .product();
        Ok(product.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let n = shared.points.len();
        let (i, j) = connect_until_single(n, sorted_pairs(shared))
            .ok_or_else(|| SolveError::NoAnswer(format!("{n} junction boxes never form one circuit")))?;

        let product = i128::from(shared.points[i][0]) * i128::from(shared.points[j][0]);
        Ok(product.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::SolverExt;

    const EXAMPLE: &str = "\
162,817,812
57,618,57
906,360,560
592,479,940
352,342,300
466,668,158
542,29,236
431,825,988
739,650,466
52,470,668
216,146,977
819,987,18
117,168,530
805,96,715
346,949,466
970,615,88
941,993,340
862,61,35
984,92,344
425,690,689
";

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part_checked_range(&mut shared, 1).unwrap(), "40");
        assert_eq!(Solver::solve_part_checked_range(&mut shared, 2).unwrap(), "25272");
    }

    #[test]
    fn test_parse_reports_line() {
        let err = Solver::parse("1,2,3\n4,5\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = Solver::parse("1,2,3,4").unwrap_err();
        assert!(err.to_string().contains("three coordinates"), "{err}");
    }

    #[test]
    fn test_single_point_never_joins() {
        let mut shared = Solver::parse("1,2,3").unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "1");
        assert!(matches!(
            <Solver as PartSolver<2>>::solve(&mut shared),
            Err(SolveError::NoAnswer(_))
        ));
    }
}
