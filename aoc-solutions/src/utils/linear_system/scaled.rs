use num_bigint::{BigInt, ToBigInt};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::ReducedSystem;

/// Integer types the free-variable search can run on.
///
/// `i128` covers every realistic machine; [`BigInt`] takes over when the
/// scaled coefficients could overflow it.
pub(super) trait Exact: Clone + Ord + Signed + From<u64> + ToBigInt + ToPrimitive {}

impl<T: Clone + Ord + Signed + From<u64> + ToBigInt + ToPrimitive> Exact for T {}

/// The pivot rows of a [`ReducedSystem`] cleared of fractions.
///
/// Row `r` reads `denoms[r] · pivot = rhs[r] - Σ coeffs[r][k] · free[k]`, so a
/// pivot is a non-negative integer exactly when the right side is
/// non-negative and divisible by `denoms[r]`.
///
/// The press total is linear in the free variables:
/// `scale · total = base + Σ weights[k] · free[k]`.
#[derive(Debug, Clone)]
pub(super) struct ScaledSystem<T> {
    pub(super) pivot_cols: Vec<usize>,
    pub(super) free_cols: Vec<usize>,
    pub(super) bounds: Vec<u64>,
    pub(super) denoms: Vec<T>,
    pub(super) rhs: Vec<T>,
    /// `coeffs[row][k]` multiplies free variable `k`
    pub(super) coeffs: Vec<Vec<T>>,
    pub(super) scale: T,
    pub(super) base: T,
    pub(super) weights: Vec<T>,
    /// `row_slack[row][k]`: most the free variables from `k` on can add to
    /// the row's right side, using their negative coefficients at full bound
    pub(super) row_slack: Vec<Vec<T>>,
    /// `weight_slack[k]`: most the free variables from `k` on can take off
    /// the scaled total, using their negative weights at full bound
    pub(super) weight_slack: Vec<T>,
}

impl ScaledSystem<BigInt> {
    /// `bounds[k]` is the largest value free variable `k` may take.
    pub(super) fn new(reduced: &ReducedSystem, bounds: Vec<u64>) -> Self {
        let free_cols = reduced.free_columns().to_vec();
        let pivot_cols = reduced.pivots().to_vec();

        let mut denoms = Vec::with_capacity(pivot_cols.len());
        let mut rhs = Vec::with_capacity(pivot_cols.len());
        let mut coeffs = Vec::with_capacity(pivot_cols.len());
        for row in 0..pivot_cols.len() {
            let fractions: Vec<&BigRational> = free_cols
                .iter()
                .map(|&col| &reduced.row(row)[col])
                .chain(std::iter::once(&reduced.rhs()[row]))
                .collect();
            let denom = fractions
                .iter()
                .fold(BigInt::one(), |acc, q| lcm(&acc, q.denom()));
            let factor = BigRational::from_integer(denom.clone());
            let mut scaled: Vec<BigInt> = fractions
                .into_iter()
                .map(|q| (q * &factor).to_integer())
                .collect();

            rhs.push(scaled.pop().unwrap_or_default());
            coeffs.push(scaled);
            denoms.push(denom);
        }

        let scale = denoms.iter().fold(BigInt::one(), |acc, d| lcm(&acc, d));
        let shares: Vec<BigInt> = denoms.iter().map(|d| &scale / d).collect();
        let base = shares.iter().zip(&rhs).map(|(s, r)| s * r).sum();
        let weights: Vec<BigInt> = (0..free_cols.len())
            .map(|k| {
                let pivot_share: BigInt = shares.iter().zip(&coeffs).map(|(s, row)| s * &row[k]).sum();
                &scale - pivot_share
            })
            .collect();

        let row_slack = coeffs
            .iter()
            .map(|row| suffix_sums(row, &bounds, |c| c.is_negative().then(|| -c)))
            .collect();
        let weight_slack = suffix_sums(&weights, &bounds, |w| w.is_negative().then(|| w.clone()));

        Self {
            pivot_cols,
            free_cols,
            bounds,
            denoms,
            rhs,
            coeffs,
            scale,
            base,
            weights,
            row_slack,
            weight_slack,
        }
    }

    /// The same system in `i128`, if no value the search can reach
    /// comes within a factor of four of overflowing it.
    pub(super) fn to_i128(&self) -> Option<ScaledSystem<i128>> {
        let limit = BigInt::from(i128::MAX / 4);
        let reach = |value: &BigInt, k: usize| value.abs() * BigInt::from(self.bounds[k]);

        let row_reach = self.rhs.iter().zip(&self.coeffs).map(|(r, row)| {
            r.abs() + row.iter().enumerate().map(|(k, c)| reach(c, k)).sum::<BigInt>()
        });
        let objective_reach = self.base.abs()
            + self.weights.iter().enumerate().map(|(k, w)| reach(w, k)).sum::<BigInt>();
        let fits = row_reach
            .chain([objective_reach, self.scale.clone()])
            .chain(self.weights.iter().map(BigInt::abs))
            .chain(self.denoms.iter().cloned())
            .all(|v| v <= limit);
        if !fits {
            return None;
        }

        let narrow = |values: &[BigInt]| values.iter().map(ToPrimitive::to_i128).collect::<Option<Vec<_>>>();
        Some(ScaledSystem {
            pivot_cols: self.pivot_cols.clone(),
            free_cols: self.free_cols.clone(),
            bounds: self.bounds.clone(),
            denoms: narrow(&self.denoms)?,
            rhs: narrow(&self.rhs)?,
            coeffs: self.coeffs.iter().map(|row| narrow(row)).collect::<Option<_>>()?,
            scale: self.scale.to_i128()?,
            base: self.base.to_i128()?,
            weights: narrow(&self.weights)?,
            row_slack: self.row_slack.iter().map(|row| narrow(row)).collect::<Option<_>>()?,
            weight_slack: narrow(&self.weight_slack)?,
        })
    }
}

/// `lcm(a, b)` for positive `a` and `b`; reducing `a / b` leaves `b / gcd(a, b)`.
fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
    a * BigRational::new(a.clone(), b.clone()).denom()
}

/// `out[k] = Σ_{j ≥ k} pick(values[j]) · bounds[j]`, with one trailing zero
fn suffix_sums(
    values: &[BigInt],
    bounds: &[u64],
    pick: impl Fn(&BigInt) -> Option<BigInt>,
) -> Vec<BigInt> {
    let mut sums = vec![BigInt::zero(); values.len() + 1];
    for k in (0..values.len()).rev() {
        let term = pick(&values[k]).map_or_else(BigInt::zero, |v| v * BigInt::from(bounds[k]));
        sums[k] = &sums[k + 1] + term;
    }
    sums
}
