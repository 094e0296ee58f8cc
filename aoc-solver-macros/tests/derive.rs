use aoc_solver::{
    AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError, Solver,
    SolverRegistryBuilder,
};

#[derive(Debug)]
struct Counts {
    values: Vec<u32>,
    total: Option<u32>,
}

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 24, tags = ["test", "counting"])]
struct CountingSolver;

impl AocParser for CountingSolver {
    type SharedData<'a> = Counts;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let values = input
            .split_whitespace()
            .map(|v| v.parse().map_err(|_| ParseError::InvalidFormat(v.to_string())))
            .collect::<Result<_, _>>()?;
        Ok(Counts { values, total: None })
    }
}

impl PartSolver<1> for CountingSolver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let total = shared.values.iter().sum();
        shared.total = Some(total);
        Ok(total.to_string())
    }
}

impl PartSolver<2> for CountingSolver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let total = shared
            .total
            .ok_or_else(|| SolveError::NoAnswer("part 1 has not run".into()))?;
        Ok((total * shared.values.len() as u32).to_string())
    }
}

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1)]
#[aoc(year = 2025, day = 25)]
struct UntaggedSolver;

impl AocParser for UntaggedSolver {
    type SharedData<'a> = &'a str;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(input)
    }
}

impl PartSolver<1> for UntaggedSolver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.len().to_string())
    }
}

#[test]
fn test_parts_constant_matches_attribute() {
    assert_eq!(<CountingSolver as Solver>::PARTS, 2);
    assert_eq!(<UntaggedSolver as Solver>::PARTS, 1);
}

#[test]
fn test_dispatch_runs_matching_part_solver() {
    let mut shared = CountingSolver::parse("1 2 3").unwrap();
    assert_eq!(CountingSolver::solve_part(&mut shared, 1).unwrap(), "6");
    assert_eq!(CountingSolver::solve_part(&mut shared, 2).unwrap(), "18");
}

#[test]
fn test_later_part_sees_earlier_mutation() {
    let mut shared = CountingSolver::parse("4 4").unwrap();
    assert!(matches!(
        CountingSolver::solve_part(&mut shared, 2),
        Err(SolveError::NoAnswer(_))
    ));
    CountingSolver::solve_part(&mut shared, 1).unwrap();
    assert_eq!(CountingSolver::solve_part(&mut shared, 2).unwrap(), "16");
}

#[test]
fn test_unknown_part_is_not_implemented() {
    let mut shared = CountingSolver::parse("1").unwrap();
    assert!(matches!(
        CountingSolver::solve_part(&mut shared, 3),
        Err(SolveError::PartNotImplemented(3))
    ));
    assert!(matches!(
        CountingSolver::solve_part(&mut shared, 0),
        Err(SolveError::PartNotImplemented(0))
    ));
}

#[test]
fn test_plugins_register_and_filter_by_tag() {
    let all = SolverRegistryBuilder::new()
        .register_all_plugins()
        .unwrap()
        .build();
    assert!(all.storage().contains(2025, 24));
    assert!(all.storage().contains(2025, 25));
    assert_eq!(all.storage().get_info(2025, 24).unwrap().parts, 2);

    let tagged = SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"counting"))
        .unwrap()
        .build();
    assert!(tagged.storage().contains(2025, 24));
    assert!(!tagged.storage().contains(2025, 25));

    let mut solver = tagged.create_solver(2025, 24, "5 5").unwrap();
    assert_eq!(solver.solve(1).unwrap().answer, "10");
    assert_eq!(solver.solve(2).unwrap().answer, "20");
}
