//! Reorders results arriving from parallel workers.
//!
//! Results are held back until every expected key ahead of them has
//! arrived, so output is always in (year, day, part) order.

use crate::executor::SolverResult;
use std::collections::{BTreeMap, BTreeSet};

/// Key for ordering results (year, day, part) - ordered ascending
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

/// Aggregator that buffers results and emits them in sorted order
pub struct ResultAggregator {
    /// Keys not yet emitted
    expected: BTreeSet<ResultKey>,
    /// Arrived results waiting for an earlier key
    pending: BTreeMap<ResultKey, SolverResult>,
}

impl ResultAggregator {
    pub fn new(expected_keys: impl IntoIterator<Item = ResultKey>) -> Self {
        Self {
            expected: expected_keys.into_iter().collect(),
            pending: BTreeMap::new(),
        }
    }

    /// Add a result and return any results ready for output (in order)
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.pending.insert(ResultKey::from(&result), result);

        let mut ready = Vec::new();
        while let Some(next) = self.expected.first().copied() {
            let Some(result) = self.pending.remove(&next) else {
                break;
            };
            self.expected.remove(&next);
            ready.push(result);
        }
        ready
    }

    /// Drain buffered results in key order, including unexpected keys
    pub fn drain(&mut self) -> Vec<SolverResult> {
        for key in self.pending.keys() {
            self.expected.remove(key);
        }
        std::mem::take(&mut self.pending).into_values().collect()
    }

    /// Check if all expected results have been received
    pub fn is_complete(&self) -> bool {
        self.expected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn key(year: u16, day: u8, part: u8) -> ResultKey {
        ResultKey { year, day, part }
    }

    fn make_result(k: ResultKey) -> SolverResult {
        SolverResult {
            year: k.year,
            day: k.day,
            part: k.part,
            answer: Ok(format!("{}_{}_{}", k.year, k.day, k.part)),
            parse_duration: Some(TimeDelta::milliseconds(5)),
            solve_duration: TimeDelta::milliseconds(10),
        }
    }

    #[test]
    fn test_in_order_results() {
        let mut agg = ResultAggregator::new([key(2025, 4, 1), key(2025, 4, 2)]);

        let ready = agg.add(make_result(key(2025, 4, 1)));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].part, 1);

        let ready = agg.add(make_result(key(2025, 4, 2)));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].part, 2);

        assert!(agg.is_complete());
    }

    #[test]
    fn test_out_of_order_results() {
        let mut agg = ResultAggregator::new([key(2025, 7, 1), key(2025, 7, 2), key(2025, 8, 1)]);

        assert!(agg.add(make_result(key(2025, 7, 2))).is_empty());
        assert!(agg.add(make_result(key(2025, 8, 1))).is_empty());

        let ready = agg.add(make_result(key(2025, 7, 1)));
        let keys: Vec<_> = ready.iter().map(ResultKey::from).collect();
        assert_eq!(keys, vec![key(2025, 7, 1), key(2025, 7, 2), key(2025, 8, 1)]);
        assert!(agg.is_complete());
    }

    #[test]
    fn test_drain_remaining() {
        let mut agg = ResultAggregator::new([key(2025, 12, 1), key(2025, 12, 2)]);
        agg.add(make_result(key(2025, 12, 2)));

        let remaining = agg.drain();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].part, 2);
        assert!(!agg.is_complete());
    }

    proptest! {
        #[test]
        fn prop_any_arrival_order_emits_sorted(
            keys in prop::collection::btree_set((2015u16..2026, 1u8..=25, 1u8..=2), 1..30)
                .prop_map(|set| set.into_iter().map(|(y, d, p)| key(y, d, p)).collect::<Vec<_>>())
                .prop_shuffle()
        ) {
            let mut agg = ResultAggregator::new(keys.iter().copied());
            let mut emitted = Vec::new();
            for &k in &keys {
                emitted.extend(agg.add(make_result(k)).iter().map(ResultKey::from));
            }

            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(emitted, sorted);
            prop_assert!(agg.is_complete());
        }
    }
}
