//! Advent of Code puzzle solutions with automatic registration
//!
//! [`utils`] holds the reusable search and simulation components: disjoint
//! sets, an exact linear system solver, polyomino packing and grid
//! propagation. The day solvers under `my_solutions` parse their input into
//! the shapes those components expect and register themselves through the
//! `AutoRegisterSolver` derive macro.

pub mod utils;

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
