//! Components shared by the day solvers

pub mod disjoint_set;
pub mod grid;
pub mod linear_system;
pub mod packing;
