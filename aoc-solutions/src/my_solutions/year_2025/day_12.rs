use anyhow::{Context, anyhow, bail, ensure};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::packing::{Packer, Region, Shape};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1)]
#[aoc(year = 2025, day = 12, tags = ["2025", "packing"])]
pub struct Solver;

#[derive(Debug)]
pub struct SharedData {
    packer: Packer,
    regions: Vec<Region>,
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_input(input).map_err(|e| ParseError::InvalidFormat(format!("{e:#}")))
    }
}

/// Shape blocks (`0:` followed by `#`/`.` rows) then one `WxH: counts` line per region
fn parse_input(input: &str) -> anyhow::Result<SharedData> {
    let mut shapes = Vec::new();
    let mut regions = Vec::new();

    for block in input.trim().split("\n\n") {
        let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
        let Some(header) = lines.next() else {
            continue;
        };

        if let Some(index) = header.strip_suffix(':') {
            let index: usize = index.parse().with_context(|| format!("shape header {header:?}"))?;
            ensure!(
                index == shapes.len(),
                "shape {index} is out of order, expected shape {}",
                shapes.len()
            );
            let pattern = lines.collect::<Vec<_>>().join("\n");
            let shape: Shape = pattern.parse().with_context(|| format!("shape {index}"))?;
            shapes.push(shape);
        } else {
            for line in std::iter::once(header).chain(lines) {
                regions.push(parse_region(line).with_context(|| format!("region {line:?}"))?);
            }
        }
    }

    Ok(SharedData {
        packer: Packer::new(shapes),
        regions,
    })
}

/// `12x5: 1 0 1 0 2 2`
fn parse_region(line: &str) -> anyhow::Result<Region> {
    let (size, counts) = line.split_once(':').ok_or_else(|| anyhow!("missing ':'"))?;
    let Some((width, height)) = size.trim().split_once('x') else {
        bail!("size should look like WxH");
    };
    let counts = counts
        .split_whitespace()
        .map(|c| c.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()?;
    let region = Region::new(width.parse()?, height.parse()?, counts);
    ensure!(
        region.area().is_some(),
        "{}x{} region has too many cells",
        region.width,
        region.height
    );
    Ok(region)
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let count = shared
            .packer
            .count_packable(&shared.regions)
            .map_err(SolveError::failed)?;
        Ok(count.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::SolverExt;

    const EXAMPLE: &str = "\
0:
###
##.
##.

1:
###
##.
.##

2:
.##
###
##.

3:
##.
###
##.

4:
###
#..
###

5:
###
.#.
###

4x4: 0 0 0 0 2 0
12x5: 1 0 1 0 2 2
12x5: 1 0 1 0 3 2
";

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(shared.packer.shapes().len(), 6);
        assert_eq!(shared.regions.len(), 3);
        assert_eq!(Solver::solve_part_checked_range(&mut shared, 1).unwrap(), "2");
    }

    #[test]
    fn test_second_part_is_out_of_range() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert!(matches!(
            Solver::solve_part_checked_range(&mut shared, 2),
            Err(SolveError::PartOutOfRange(2))
        ));
    }

    #[test]
    fn test_parse_region() {
        assert_eq!(
            parse_region("12x5: 1 0 1 0 2 2").unwrap(),
            Region::new(12, 5, vec![1, 0, 1, 0, 2, 2])
        );
        assert!(parse_region("12by5: 1").is_err());
        assert!(parse_region("12x5 1").is_err());

        let err = parse_region("99999999999x99999999999: 1").unwrap_err();
        assert!(err.to_string().contains("too many cells"), "{err}");
    }

    #[test]
    fn test_shapes_must_be_numbered_in_order() {
        let err = Solver::parse("1:\n#\n\n1x1: 1").unwrap_err();
        assert!(err.to_string().contains("out of order"), "{err}");
    }

    #[test]
    fn test_unknown_shape_fails_to_solve() {
        let mut shared = Solver::parse("0:\n#\n\n2x2: 1 1").unwrap();
        assert!(matches!(
            <Solver as PartSolver<1>>::solve(&mut shared),
            Err(SolveError::SolveFailed(_))
        ));
    }
}
