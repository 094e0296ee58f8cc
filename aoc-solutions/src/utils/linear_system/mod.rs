//! Exact non-negative integer solutions of `A·x = b` for 0/1 matrices.
//!
//! `A` has one row per counter (equation) and one column per button
//! (variable); `A[r][c] = 1` when button `c` increments counter `r`. Every
//! variable is a press count, so only non-negative integer solutions count,
//! and [`LinearSystem::minimize`] looks for the one with the fewest presses.
//!
//! Elimination runs over [`BigRational`], so no pivot ever loses precision.
//! After reduction the system is `pivot = rhs - Σ coeff·free`. Each pivot row
//! is then multiplied by the lcm of its denominators so the search runs on
//! plain integers (`i128` when nothing can overflow it, [`BigInt`] otherwise).
//! The free variables are enumerated depth-first; a branch is dropped once
//! some pivot is forced negative or the press total can no longer improve.
//!
//! ```
//! use aoc_solutions::utils::linear_system::LinearSystem;
//! use num_bigint::BigUint;
//!
//! // counters: x0 + x1 = 3, x1 + x2 = 5
//! let system = LinearSystem::from_buttons(2, &[vec![0], vec![0, 1], vec![1]], &[3, 5]).unwrap();
//! let best = system.minimize().unwrap();
//! assert_eq!(best.total, BigUint::from(5u32));
//! ```
//!
//! [`parity`] covers the toggle variant of the same machines, where each
//! button flips its lights instead of incrementing counters.

pub mod parity;
mod scaled;
mod search;

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::Zero;
use thiserror::Error;
use tracing::{debug, warn};

use scaled::ScaledSystem;
use search::{FreeSearch, SearchOutcome};

/// Free-variable count above which the bounded enumeration is logged as expensive
pub const FREE_VARIABLE_WARN_THRESHOLD: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    #[error("row {row} has {found} coefficients, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("target has {found} entries but the system has {expected} rows")]
    TargetLength { expected: usize, found: usize },
    #[error("coefficient at ({row}, {col}) is {value}, expected 0 or 1")]
    NonBinaryCoefficient { row: usize, col: usize, value: u8 },
    #[error("button {button} touches counter {counter}, but there are only {counters}")]
    CounterOutOfRange {
        button: usize,
        counter: usize,
        counters: usize,
    },
    #[error("{0} buttons is too many for an exhaustive toggle search")]
    TooManyButtons(usize),
}

/// A validated 0/1 system `A·x = b` with non-negative integer targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearSystem {
    matrix: Vec<Vec<u8>>,
    target: Vec<u64>,
    cols: usize,
}

/// Minimal non-negative integer solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Value of each variable, indexed by column
    pub values: Vec<BigUint>,
    /// Sum of `values`
    pub total: BigUint,
}

impl LinearSystem {
    /// Build from an explicit row-major matrix.
    ///
    /// An empty matrix is a system with no rows and no variables.
    pub fn from_binary(matrix: &[Vec<u8>], target: &[u64]) -> Result<Self, SystemError> {
        let cols = matrix.first().map_or(0, Vec::len);
        for (row, coefficients) in matrix.iter().enumerate() {
            if coefficients.len() != cols {
                return Err(SystemError::RaggedRow {
                    row,
                    expected: cols,
                    found: coefficients.len(),
                });
            }
            if let Some((col, &value)) = coefficients.iter().enumerate().find(|&(_, &v)| v > 1) {
                return Err(SystemError::NonBinaryCoefficient { row, col, value });
            }
        }
        if target.len() != matrix.len() {
            return Err(SystemError::TargetLength {
                expected: matrix.len(),
                found: target.len(),
            });
        }

        Ok(Self {
            matrix: matrix.to_vec(),
            target: target.to_vec(),
            cols,
        })
    }

    /// Build from button wiring: `buttons[c]` lists the counters column `c` increments.
    ///
    /// Listing a counter twice in one button still counts once.
    pub fn from_buttons(
        counters: usize,
        buttons: &[Vec<usize>],
        target: &[u64],
    ) -> Result<Self, SystemError> {
        if target.len() != counters {
            return Err(SystemError::TargetLength {
                expected: counters,
                found: target.len(),
            });
        }

        let mut matrix = vec![vec![0u8; buttons.len()]; counters];
        for (button, wired) in buttons.iter().enumerate() {
            for &counter in wired {
                let row = matrix
                    .get_mut(counter)
                    .ok_or(SystemError::CounterOutOfRange {
                        button,
                        counter,
                        counters,
                    })?;
                row[button] = 1;
            }
        }

        Ok(Self {
            matrix,
            target: target.to_vec(),
            cols: buttons.len(),
        })
    }

    pub fn rows(&self) -> usize {
        self.matrix.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn target(&self) -> &[u64] {
        &self.target
    }

    /// Gauss-Jordan elimination to reduced row echelon form.
    ///
    /// Columns are scanned left to right; the first row at or below the
    /// current rank with a nonzero entry becomes the pivot row. Columns
    /// without a pivot are free.
    pub fn reduce(&self) -> ReducedSystem {
        let mut rows: Vec<Vec<BigRational>> = self
            .matrix
            .iter()
            .map(|row| row.iter().map(|&c| rational(u64::from(c))).collect())
            .collect();
        let mut rhs: Vec<BigRational> = self.target.iter().map(|&t| rational(t)).collect();

        let mut pivots = Vec::new();
        let mut free = Vec::new();

        for col in 0..self.cols {
            let rank = pivots.len();
            let Some(pivot) = (rank..rows.len()).find(|&r| !rows[r][col].is_zero()) else {
                free.push(col);
                continue;
            };
            rows.swap(rank, pivot);
            rhs.swap(rank, pivot);

            let scale = rows[rank][col].recip();
            for value in &mut rows[rank][col..] {
                *value = &*value * &scale;
            }
            rhs[rank] = &rhs[rank] * &scale;

            let pivot_row = rows[rank].clone();
            let pivot_rhs = rhs[rank].clone();
            for r in 0..rows.len() {
                if r == rank || rows[r][col].is_zero() {
                    continue;
                }
                let factor = rows[r][col].clone();
                for (value, p) in rows[r][col..].iter_mut().zip(&pivot_row[col..]) {
                    *value -= &factor * p;
                }
                rhs[r] -= &factor * &pivot_rhs;
            }

            pivots.push(col);
        }

        let consistent = rhs[pivots.len()..].iter().all(Zero::is_zero);

        ReducedSystem {
            rows,
            rhs,
            pivots,
            free,
            consistent,
        }
    }

    /// Non-negative integer solution with the smallest total, `None` if there is none.
    pub fn minimize(&self) -> Option<Solution> {
        let reduced = self.reduce();
        if !reduced.is_consistent() {
            debug!(rows = self.rows(), cols = self.cols, "inconsistent system");
            return None;
        }

        let free = reduced.free_columns();
        if free.len() > FREE_VARIABLE_WARN_THRESHOLD {
            warn!(
                free = free.len(),
                "large number of free variables, enumeration may be slow"
            );
        }

        let bounds: Vec<u64> = free.iter().map(|&col| self.free_bound(col)).collect();
        let scaled = ScaledSystem::new(&reduced, bounds);
        let SearchOutcome { best, nodes } = match scaled.to_i128() {
            Some(narrow) => FreeSearch::new(&narrow).run(),
            None => {
                debug!("scaled rows exceed i128, searching with BigInt");
                FreeSearch::new(&scaled).run()
            }
        };

        debug!(
            pivots = reduced.pivots().len(),
            free = free.len(),
            nodes,
            found = best.is_some(),
            "free-variable search finished"
        );
        best
    }

    /// Upper bound for a free variable: it can never exceed the target of any
    /// counter it feeds, and an unwired button is never worth pressing.
    fn free_bound(&self, col: usize) -> u64 {
        self.matrix
            .iter()
            .zip(&self.target)
            .filter(|(row, _)| row[col] == 1)
            .map(|(_, &t)| t)
            .min()
            .unwrap_or(0)
    }
}

/// Reduced row echelon form of a [`LinearSystem`]
#[derive(Debug, Clone)]
pub struct ReducedSystem {
    rows: Vec<Vec<BigRational>>,
    rhs: Vec<BigRational>,
    /// `pivots[r]` is the pivot column of row `r`
    pivots: Vec<usize>,
    free: Vec<usize>,
    consistent: bool,
}

impl ReducedSystem {
    /// Pivot column per row, for the first `rank` rows
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// Columns without a pivot, ascending
    pub fn free_columns(&self) -> &[usize] {
        &self.free
    }

    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    /// `false` when some zero row has a nonzero right-hand side
    pub fn is_consistent(&self) -> bool {
        self.consistent
    }

    pub fn row(&self, row: usize) -> &[BigRational] {
        &self.rows[row]
    }

    pub fn rhs(&self) -> &[BigRational] {
        &self.rhs
    }

    pub fn cols(&self) -> usize {
        self.pivots.len() + self.free.len()
    }
}

fn rational(value: u64) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}
