//! Piecewise-constant state history and its time-weighted histogram.

use super::{Bucket, BucketSet};
use serde::Serialize;

/// Time spent in each bucket of a [`BucketSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketTimes {
    /// Seconds per bucket, indexed by [`BucketSet::slot`].
    pub seconds: Vec<f64>,
    /// Sum of all non-negative segment durations.
    pub total: f64,
}

impl BucketTimes {
    pub fn zeroed(buckets: &BucketSet) -> Self {
        Self {
            seconds: vec![0.0; buckets.len()],
            total: 0.0,
        }
    }

    /// Add another channel's times into this one.
    pub fn merge(&mut self, other: &BucketTimes) {
        for (acc, secs) in self.seconds.iter_mut().zip(&other.seconds) {
            *acc += secs;
        }
        self.total += other.total;
    }

    pub fn get(&self, bucket: Bucket, buckets: &BucketSet) -> f64 {
        self.seconds[buckets.slot(bucket)]
    }
}

/// Ordered `(timestamp, state)` breakpoints; each state holds until the next breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTimeline<S> {
    breakpoints: Vec<(f64, S)>,
}

impl<S: Copy + PartialEq> StateTimeline<S> {
    pub fn new(initial_state: S, start_time: f64) -> Self {
        Self {
            breakpoints: vec![(start_time, initial_state)],
        }
    }

    /// Record that the state became `state` at `timestamp`.
    ///
    /// Equal adjacent states are coalesced. A change at the same instant as the last
    /// breakpoint replaces it, so timestamps stay strictly increasing.
    pub fn record(&mut self, timestamp: f64, state: S) {
        let Some(&(last_ts, last_state)) = self.breakpoints.last() else {
            self.breakpoints.push((timestamp, state));
            return;
        };
        if last_state == state {
            return;
        }

        if timestamp == last_ts {
            self.breakpoints.pop();
            let merges_with_previous = self
                .breakpoints
                .last()
                .map(|&(_, prev)| prev == state)
                .unwrap_or(false);
            if !merges_with_previous {
                self.breakpoints.push((timestamp, state));
            }
            return;
        }

        self.breakpoints.push((timestamp, state));
    }

    pub fn breakpoints(&self) -> &[(f64, S)] {
        &self.breakpoints
    }

    /// Accumulate each segment's duration into the bucket of its state.
    ///
    /// The last segment runs to `end_time`. Negative segments are skipped and do not
    /// count towards the total.
    pub fn reduce<F>(&self, end_time: f64, buckets: &BucketSet, classify: F) -> BucketTimes
    where
        F: Fn(S, &BucketSet) -> Bucket,
    {
        let mut times = BucketTimes::zeroed(buckets);

        for (i, &(start, state)) in self.breakpoints.iter().enumerate() {
            let next = self
                .breakpoints
                .get(i + 1)
                .map(|&(t, _)| t)
                .unwrap_or(end_time);
            let duration = next - start;
            if duration < 0.0 {
                continue;
            }

            times.total += duration;
            times.seconds[buckets.slot(classify(state, buckets))] += duration;
        }

        times
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{liquidity_bucket, slot_bucket};

    fn slot_buckets() -> BucketSet {
        BucketSet::new(vec![0.0, 1.0, 2.0, 5.0, 10.0]).unwrap()
    }

    #[test]
    fn test_equal_states_are_coalesced() {
        let mut tl = StateTimeline::new(0u32, 0.0);
        tl.record(10.0, 0);
        tl.record(20.0, 1);
        tl.record(30.0, 1);
        assert_eq!(tl.breakpoints(), &[(0.0, 0), (20.0, 1)]);
    }

    #[test]
    fn test_same_instant_change_replaces_breakpoint() {
        let mut tl = StateTimeline::new(0u32, 0.0);
        tl.record(10.0, 2);
        tl.record(10.0, 3);
        assert_eq!(tl.breakpoints(), &[(0.0, 0), (10.0, 3)]);

        tl.record(10.0, 0);
        assert_eq!(tl.breakpoints(), &[(0.0, 0)]);
    }

    #[test]
    fn test_reduce_accumulates_by_bucket() {
        let buckets = slot_buckets();
        let mut tl = StateTimeline::new(0u32, 0.0);
        tl.record(10.0, 3);
        tl.record(15.0, 12);
        tl.record(18.0, 0);

        let times = tl.reduce(30.0, &buckets, slot_bucket);
        assert_eq!(times.get(Bucket::Threshold(0), &buckets), 22.0);
        assert_eq!(times.get(Bucket::Threshold(2), &buckets), 5.0);
        assert_eq!(times.get(Bucket::Overflow, &buckets), 3.0);
        assert_eq!(times.total, 30.0);
    }

    #[test]
    fn test_reduce_conserves_time_for_any_classifier() {
        let buckets = BucketSet::new(vec![0.0, 0.5, 1.0, 2.0, 5.0]).unwrap();
        let mut tl = StateTimeline::new(0.0f64, 100.25);
        for (i, pct) in [0.3, 0.9, 7.5, 0.0, 1.5, 2.2].iter().enumerate() {
            tl.record(100.25 + 13.7 * (i + 1) as f64, *pct);
        }
        let end = 400.0;
        let by_liquidity = tl.reduce(end, &buckets, liquidity_bucket);
        let everything_overflow = tl.reduce(end, &buckets, |_, _| Bucket::Overflow);

        for times in [by_liquidity, everything_overflow] {
            let sum: f64 = times.seconds.iter().sum();
            assert!((sum - (end - 100.25)).abs() < 1e-9);
            assert!((times.total - (end - 100.25)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_negative_segments_are_skipped() {
        let buckets = slot_buckets();
        let mut tl = StateTimeline::new(0u32, 0.0);
        tl.record(50.0, 1);
        let times = tl.reduce(40.0, &buckets, slot_bucket);
        assert_eq!(times.total, 50.0);
        assert_eq!(times.get(Bucket::Threshold(1), &buckets), 0.0);
    }

    #[test]
    fn test_merge_sums_bucket_times() {
        let buckets = slot_buckets();
        let mut a = BucketTimes::zeroed(&buckets);
        let mut b = BucketTimes::zeroed(&buckets);
        a.seconds[0] = 5.0;
        a.total = 5.0;
        b.seconds[0] = 1.0;
        b.seconds[5] = 2.0;
        b.total = 3.0;
        a.merge(&b);
        assert_eq!(a.seconds[0], 6.0);
        assert_eq!(a.seconds[5], 2.0);
        assert_eq!(a.total, 8.0);
    }
}
