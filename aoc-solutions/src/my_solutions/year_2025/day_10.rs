use anyhow::{Context, anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use num_bigint::BigUint;

use crate::utils::linear_system::LinearSystem;
use crate::utils::linear_system::parity::min_toggle_presses;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 10, tags = ["2025", "linear-system"])]
pub struct Solver;

/// One machine: light pattern, button wiring and joltage requirements
#[derive(Debug)]
pub struct Machine {
    lights: Vec<bool>,
    buttons: Vec<Vec<usize>>,
    joltage: LinearSystem,
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Machine>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .trim()
            .lines()
            .enumerate()
            .map(|(line_idx, line)| parse_machine(line).with_context(|| format!("line {}", line_idx + 1)))
            .collect::<Result<Vec<_>, anyhow::Error>>()
            .map_err(|e| ParseError::InvalidFormat(format!("{e:#}")))
    }
}

/// `[.##.] (3) (1,3) (2) {3,5,4,7}`
fn parse_machine(line: &str) -> anyhow::Result<Machine> {
    let mut lights = None;
    let mut buttons = Vec::new();
    let mut targets = None;

    for token in line.split_whitespace() {
        if let Some(pattern) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            lights = Some(
                pattern
                    .chars()
                    .map(|ch| match ch {
                        '#' => Ok(true),
                        '.' => Ok(false),
                        other => Err(anyhow!("unexpected light {other:?}")),
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?,
            );
        } else if let Some(wiring) = token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            buttons.push(parse_list::<usize>(wiring).with_context(|| format!("button {token}"))?);
        } else if let Some(values) = token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
            targets = Some(parse_list::<u64>(values).with_context(|| format!("joltage {token}"))?);
        } else {
            bail!("unexpected token {token:?}");
        }
    }

    let lights = lights.ok_or_else(|| anyhow!("missing light pattern"))?;
    let targets = targets.ok_or_else(|| anyhow!("missing joltage requirements"))?;
    if let Some(light) = buttons.iter().flatten().find(|&&light| light >= lights.len()) {
        bail!("button wired to light {light}, but there are only {}", lights.len());
    }
    let joltage = LinearSystem::from_buttons(targets.len(), &buttons, &targets)?;

    Ok(Machine {
        lights,
        buttons,
        joltage,
    })
}

fn parse_list<T: std::str::FromStr>(list: &str) -> anyhow::Result<Vec<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    list.split(',')
        .map(|v| v.trim().parse::<T>().map_err(anyhow::Error::from))
        .collect()
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut total = 0u64;
        for (idx, machine) in shared.iter().enumerate() {
            let presses = min_toggle_presses(&machine.lights, &machine.buttons)
                .map_err(SolveError::failed)?
                .ok_or_else(|| SolveError::NoAnswer(format!("machine {} cannot reach its lights", idx + 1)))?;
            total += u64::from(presses);
        }
        Ok(total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut total = BigUint::default();
        for (idx, machine) in shared.iter().enumerate() {
            let solution = machine.joltage.minimize().ok_or_else(|| {
                SolveError::NoAnswer(format!("machine {} cannot reach its joltage", idx + 1))
            })?;
            total += solution.total;
        }
        Ok(total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::SolverExt;

    const EXAMPLE: &str = "\
[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}
";

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(shared.len(), 3);
        assert_eq!(Solver::solve_part_checked_range(&mut shared, 1).unwrap(), "7");
        assert_eq!(Solver::solve_part_checked_range(&mut shared, 2).unwrap(), "33");
    }

    #[test]
    fn test_parse_machine() {
        let machine = parse_machine("[#.] (0) (0,1) {2,1}").unwrap();
        assert_eq!(machine.lights, vec![true, false]);
        assert_eq!(machine.buttons, vec![vec![0], vec![0, 1]]);
        assert_eq!(machine.joltage.target(), &[2, 1]);
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        let err = Solver::parse("[.#] (0) {1,1}\n[.#] (0,2) {1,1}").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");

        assert!(parse_machine("(0) {1}").is_err());
        assert!(parse_machine("[#] (0)").is_err());
        assert!(parse_machine("[#] (x) {1}").is_err());
        assert!(parse_machine("[#] (0) {1} extra").is_err());
    }

    #[test]
    fn test_infeasible_joltage() {
        let mut shared = Solver::parse("[##] (0,1) {1,2}").unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "1");
        assert!(matches!(
            <Solver as PartSolver<2>>::solve(&mut shared),
            Err(SolveError::NoAnswer(_))
        ));
    }
}
