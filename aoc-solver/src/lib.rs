//! Advent of Code Solver Library
//!
//! A small, type-safe framework for puzzle solvers. Each day is a type that
//! parses its input once ([`AocParser`]) and answers one or more parts
//! ([`PartSolver`]), tied together by [`Solver`] and registered by year and
//! day in a [`SolverRegistry`].
//!
//! # Quick Example
//!
//! ```
//! use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverRegistryBuilder};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2)]
//! struct Sums;
//!
//! impl AocParser for Sums {
//!     type SharedData<'a> = Vec<i64>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .lines()
//!             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Sums {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().sum::<i64>().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Sums {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().map(|v| v * v).sum::<i64>().to_string())
//!     }
//! }
//!
//! let registry = SolverRegistryBuilder::new()
//!     .register_solver::<Sums>(2025, 1)
//!     .unwrap()
//!     .build();
//!
//! let mut solver = registry.create_solver(2025, 1, "1\n2\n3").unwrap();
//! assert_eq!(solver.solve(1).unwrap().answer, "6");
//! assert_eq!(solver.solve(2).unwrap().answer, "14");
//! ```
//!
//! # Key Concepts
//!
//! ## Parts share parsed data
//!
//! `PartSolver::solve` gets `&mut SharedData`, so a day whose parts are two
//! views of one computation can run it once and cache it in the shared data.
//!
//! ## DynSolver
//!
//! [`DynSolver`] erases the solver type so the registry and the CLI can treat
//! every day uniformly; it also records parse and solve timings.
//!
//! ## Plugins
//!
//! `#[derive(AutoRegisterSolver)]` with `#[aoc(year = .., day = .., tags = [..])]`
//! submits a [`SolverPlugin`] through `inventory`, and
//! [`SolverRegistryBuilder::register_all_plugins`] picks them all up.

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance};
pub use registry::{
    BASE_YEAR, CAPACITY, DAYS_PER_YEAR, FactoryInfo, MAX_YEARS, RegisterableSolver, SolverFactory,
    SolverPlugin, SolverRegistry, SolverRegistryBuilder, SolverStorage,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Used by the code `AutoRegisterSolver` expands to
pub use inventory;

pub use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
