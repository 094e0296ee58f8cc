//! Core solver traits

use crate::error::{ParseError, SolveError};

/// Parses raw puzzle input into the structured data every part works on.
///
/// Parsing happens once per input; all parts of a day share the result, so
/// expensive work that both parts need can be cached inside `SharedData`.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError};
///
/// struct Depths;
///
/// impl AocParser for Depths {
///     type SharedData<'a> = Vec<u32>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
///             .collect()
///     }
/// }
///
/// assert_eq!(Depths::parse("3\n1\n2").unwrap(), vec![3, 1, 2]);
/// ```
pub trait AocParser {
    /// Parsed input plus any intermediate results shared between parts.
    ///
    /// The lifetime lets a parser borrow from the input (`&'a str`, grids of
    /// `&'a [u8]`) when no owned transformation is needed.
    type SharedData<'a>;

    /// Parse the input string into the shared data structure.
    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError>;
}

/// Solves one part of a puzzle.
///
/// The const generic `N` is the part number, so a missing part is a missing
/// impl rather than a runtime match arm. `#[derive(AocSolver)]` wires the
/// impls into [`Solver::solve_part`].
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, PartSolver, ParseError, SolveError};
///
/// struct Depths;
///
/// impl AocParser for Depths {
///     type SharedData<'a> = Vec<u32>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
///             .collect()
///     }
/// }
///
/// impl PartSolver<1> for Depths {
///     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         let rising = shared.windows(2).filter(|w| w[1] > w[0]).count();
///         Ok(rising.to_string())
///     }
/// }
///
/// let mut shared = Depths::parse("1\n3\n2\n5").unwrap();
/// assert_eq!(<Depths as PartSolver<1>>::solve(&mut shared).unwrap(), "2");
/// ```
pub trait PartSolver<const N: u8>: AocParser {
    /// Solve this part of the puzzle against the shared data.
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError>;
}

/// Core trait that every registered solver implements.
///
/// Usually generated by `#[derive(AocSolver)]`, which dispatches `solve_part`
/// to the matching [`PartSolver`] impl. Hand-written impls are fine too:
///
/// ```
/// use aoc_solver::{AocParser, ParseError, SolveError, Solver};
///
/// struct Pairs;
///
/// impl AocParser for Pairs {
///     type SharedData<'a> = Vec<(i64, i64)>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|line| {
///                 let (a, b) = line
///                     .split_once(',')
///                     .ok_or_else(|| ParseError::MissingData(line.to_string()))?;
///                 let a = a.trim().parse().map_err(|_| ParseError::InvalidFormat(line.to_string()))?;
///                 let b = b.trim().parse().map_err(|_| ParseError::InvalidFormat(line.to_string()))?;
///                 Ok((a, b))
///             })
///             .collect()
///     }
/// }
///
/// impl Solver for Pairs {
///     const PARTS: u8 = 2;
///
///     fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
///         match part {
///             1 => Ok(shared.iter().map(|(a, b)| a + b).sum::<i64>().to_string()),
///             2 => Ok(shared.iter().map(|(a, b)| a * b).sum::<i64>().to_string()),
///             _ => Err(SolveError::PartNotImplemented(part)),
///         }
///     }
/// }
///
/// let mut shared = Pairs::parse("1,2\n3,4").unwrap();
/// assert_eq!(Pairs::solve_part(&mut shared, 1).unwrap(), "10");
/// assert_eq!(Pairs::solve_part(&mut shared, 2).unwrap(), "14");
/// ```
pub trait Solver: AocParser {
    /// Number of parts this solver implements
    const PARTS: u8;

    /// Solve a specific part of the problem
    ///
    /// # Returns
    /// * `Ok(String)` - The answer for this part
    /// * `Err(SolveError::PartNotImplemented)` - The part is not implemented
    /// * `Err(SolveError::SolveFailed)` - An error occurred while solving
    fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError>;
}

/// Range-checked dispatch on top of [`Solver`].
pub trait SolverExt: Solver {
    /// Like [`Solver::solve_part`], but rejects `part == 0` and `part > PARTS`
    /// with [`SolveError::PartOutOfRange`] before dispatching.
    fn solve_part_checked_range(
        shared: &mut Self::SharedData<'_>,
        part: u8,
    ) -> Result<String, SolveError> {
        if (1..=Self::PARTS).contains(&part) {
            Self::solve_part(shared, part)
        } else {
            Err(SolveError::PartOutOfRange(part))
        }
    }
}

impl<T: Solver + ?Sized> SolverExt for T {}
