use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use super::Solution;
use super::scaled::{Exact, ScaledSystem};

/// What a finished [`FreeSearch`] found
#[derive(Debug)]
pub(super) struct SearchOutcome {
    pub(super) best: Option<Solution>,
    /// Search-tree nodes visited, leaves included
    pub(super) nodes: u64,
}

/// Depth-first enumeration of free-variable assignments over a [`ScaledSystem`].
///
/// Each free variable only ranges over the values that leave every pivot
/// reachable as non-negative once the remaining free variables push their
/// hardest. Values are tried cheapest first and the loop stops as soon as
/// the smallest total still reachable is no better than the best found.
pub(super) struct FreeSearch<'a, T> {
    system: &'a ScaledSystem<T>,
    /// `denoms[r] · pivot[r]` under the current assignment
    residual: Vec<T>,
    /// `scale · total` under the current assignment
    objective: T,
    assignment: Vec<u64>,
    best_objective: Option<T>,
    best: Option<Solution>,
    nodes: u64,
}

impl<'a, T: Exact> FreeSearch<'a, T> {
    pub(super) fn new(system: &'a ScaledSystem<T>) -> Self {
        Self {
            system,
            residual: system.rhs.clone(),
            objective: system.base.clone(),
            assignment: vec![0; system.bounds.len()],
            best_objective: None,
            best: None,
            nodes: 0,
        }
    }

    pub(super) fn run(mut self) -> SearchOutcome {
        self.descend(0);
        SearchOutcome {
            best: self.best,
            nodes: self.nodes,
        }
    }

    fn descend(&mut self, depth: usize) {
        self.nodes += 1;
        let system = self.system;
        if depth == system.bounds.len() {
            self.record();
            return;
        }

        let Some((lo, hi)) = self.interval(depth) else {
            return;
        };
        let ascending = !system.weights[depth].is_negative();
        let floor = &system.weight_slack[depth + 1];

        for step in 0..=(hi - lo) {
            let value = if ascending { lo + step } else { hi - step };
            self.assign(depth, value);
            let reachable = self.objective.clone() + floor.clone();
            if self.best_objective.as_ref().is_some_and(|best| &reachable >= best) {
                break;
            }
            self.descend(depth + 1);
        }
        self.assign(depth, 0);
    }

    /// Values of free variable `depth` that keep every pivot row satisfiable,
    /// with all later free variables still at zero.
    fn interval(&self, depth: usize) -> Option<(u64, u64)> {
        let system = self.system;
        let mut lo = 0u64;
        let mut hi = system.bounds[depth];

        for (row, residual) in self.residual.iter().enumerate() {
            let room = residual.clone() + system.row_slack[row][depth + 1].clone();
            let coeff = &system.coeffs[row][depth];
            if coeff.is_positive() {
                let most = floor_div(room, coeff.clone());
                if most.is_negative() {
                    return None;
                }
                hi = hi.min(most.to_u64().unwrap_or(u64::MAX));
            } else if coeff.is_negative() {
                let least = ceil_div(-room, -coeff.clone());
                if least > T::from(hi) {
                    return None;
                }
                lo = lo.max(least.to_u64().unwrap_or(0));
            } else if room.is_negative() {
                return None;
            }
        }

        (lo <= hi).then_some((lo, hi))
    }

    fn assign(&mut self, depth: usize, value: u64) {
        let previous = std::mem::replace(&mut self.assignment[depth], value);
        if previous == value {
            return;
        }
        let delta = T::from(value) - T::from(previous);
        let system = self.system;
        for (residual, coeffs) in self.residual.iter_mut().zip(&system.coeffs) {
            *residual = residual.clone() - coeffs[depth].clone() * delta.clone();
        }
        self.objective = self.objective.clone() + system.weights[depth].clone() * delta;
    }

    fn record(&mut self) {
        if self
            .best_objective
            .as_ref()
            .is_some_and(|best| &self.objective >= best)
        {
            return;
        }
        let Some(solution) = self.solution() else {
            return;
        };
        self.best_objective = Some(self.objective.clone());
        self.best = Some(solution);
    }

    /// The full solution for the current assignment, `None` if some pivot is
    /// negative or fractional.
    fn solution(&self) -> Option<Solution> {
        let system = self.system;
        let integral = self
            .residual
            .iter()
            .zip(&system.denoms)
            .all(|(residual, denom)| !residual.is_negative() && (residual.clone() % denom.clone()).is_zero());
        if !integral {
            return None;
        }

        let mut values = vec![BigUint::zero(); system.pivot_cols.len() + system.free_cols.len()];
        for (&col, &value) in system.free_cols.iter().zip(&self.assignment) {
            values[col] = BigUint::from(value);
        }
        for ((&col, residual), denom) in system.pivot_cols.iter().zip(&self.residual).zip(&system.denoms) {
            values[col] = (residual.clone() / denom.clone()).to_bigint()?.to_biguint()?;
        }

        let total = values.iter().sum();
        Some(Solution { values, total })
    }
}

/// `⌊a / b⌋` for `b > 0`
fn floor_div<T: Exact>(a: T, b: T) -> T {
    let quotient = a.clone() / b.clone();
    if (a % b).is_negative() {
        quotient - T::one()
    } else {
        quotient
    }
}

/// `⌈a / b⌉` for `b > 0`
fn ceil_div<T: Exact>(a: T, b: T) -> T {
    let quotient = a.clone() / b.clone();
    if (a % b).is_positive() {
        quotient + T::one()
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::linear_system::LinearSystem;
    use num_bigint::BigInt;
    use proptest::prelude::*;

    fn scaled(system: &LinearSystem) -> ScaledSystem<BigInt> {
        let reduced = system.reduce();
        let bounds = vec![system.target().iter().copied().max().unwrap_or(0); reduced.free_columns().len()];
        ScaledSystem::new(&reduced, bounds)
    }

    #[test]
    fn test_floor_and_ceil_division() {
        assert_eq!(floor_div(7i128, 2), 3);
        assert_eq!(floor_div(-7i128, 2), -4);
        assert_eq!(floor_div(-6i128, 2), -3);
        assert_eq!(ceil_div(7i128, 2), 4);
        assert_eq!(ceil_div(-7i128, 2), -3);
        assert_eq!(ceil_div(6i128, 2), 3);
        assert_eq!(floor_div(BigInt::from(-1), BigInt::from(3)), BigInt::from(-1));
    }

    #[test]
    fn test_half_integral_rows_need_matching_parity() {
        // x0 = (1 + x3)/2, x1 = (1 - x3)/2, x2 = (1 - x3)/2; only x3 = 1 works
        let system = LinearSystem::from_binary(
            &[vec![1, 1, 0, 0], vec![0, 1, 1, 1], vec![1, 0, 1, 0]],
            &[1, 1, 1],
        )
        .unwrap();
        let outcome = FreeSearch::new(&scaled(&system)).run();
        let best = outcome.best.unwrap();
        assert_eq!(best.values, vec![BigUint::from(1u32), BigUint::zero(), BigUint::zero(), BigUint::from(1u32)]);
        assert_eq!(best.total, BigUint::from(2u32));
    }

    #[test]
    fn test_forced_negative_pivot_cuts_at_root() {
        // x0 + x1 + x2 = 1 and x0 + x2 = 3 force x1 = -2 whatever x2 is
        let system = LinearSystem::from_binary(&[vec![1, 1, 1], vec![1, 0, 1]], &[1, 3]).unwrap();
        let outcome = FreeSearch::new(&scaled(&system)).run();
        assert!(outcome.best.is_none());
        assert_eq!(outcome.nodes, 1);
    }

    proptest! {
        #[test]
        fn prop_narrow_and_wide_searches_agree(
            matrix in prop::collection::vec(prop::collection::vec(0u8..2, 5), 1..5),
            target_seed in prop::collection::vec(0u64..12, 4),
        ) {
            let target = &target_seed[..matrix.len()];
            let system = LinearSystem::from_binary(&matrix, target).unwrap();
            let wide = scaled(&system);
            let narrow = wide.to_i128().unwrap();

            let wide = FreeSearch::new(&wide).run();
            let narrow = FreeSearch::new(&narrow).run();
            prop_assert_eq!(
                wide.best.map(|s| s.total),
                narrow.best.map(|s| s.total)
            );
            prop_assert_eq!(wide.nodes, narrow.nodes);
        }
    }
}
