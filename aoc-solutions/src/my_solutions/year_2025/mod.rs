//! 2025 puzzles built on the [`crate::utils`] components

pub mod day_4;
pub mod day_7;
pub mod day_8;
pub mod day_10;
pub mod day_12;
