//! Histogram bucket sets and the classifiers that map a state into them.

use super::MetricsError;
use serde::Serialize;

/// Percentages below this are treated as an empty channel.
pub const LIQUIDITY_EPSILON_PERCENT: f64 = 0.001;

/// A histogram bucket: one of the configured thresholds, or the overflow bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Bucket {
    /// Index into the bucket set's thresholds.
    Threshold(usize),
    /// Values beyond the largest threshold.
    Overflow,
}

/// Ascending thresholds plus an implicit overflow bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSet {
    thresholds: Vec<f64>,
}

impl BucketSet {
    /// Build a bucket set from strictly ascending, finite thresholds.
    pub fn new(thresholds: Vec<f64>) -> Result<Self, MetricsError> {
        if thresholds.is_empty() {
            return Err(MetricsError::InvalidBuckets("no thresholds".to_string()));
        }
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(MetricsError::InvalidBuckets(
                "thresholds must be finite".to_string(),
            ));
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MetricsError::InvalidBuckets(format!(
                "thresholds must be strictly ascending: {:?}",
                thresholds
            )));
        }
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Number of buckets including overflow.
    pub fn len(&self) -> usize {
        self.thresholds.len() + 1
    }

    /// Always false: the overflow bucket exists even past the last threshold.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Position of `bucket` in a per-bucket array of length [`BucketSet::len`].
    pub fn slot(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Threshold(i) => i,
            Bucket::Overflow => self.thresholds.len(),
        }
    }

    /// All buckets in display order, overflow last.
    pub fn buckets(&self) -> impl Iterator<Item = Bucket> + '_ {
        (0..self.thresholds.len())
            .map(Bucket::Threshold)
            .chain(std::iter::once(Bucket::Overflow))
    }

    fn last(&self) -> f64 {
        self.thresholds[self.thresholds.len() - 1]
    }
}

/// Exact-or-floor: a count maps to the largest threshold not above it.
///
/// Counts below the first threshold fall into the first bucket.
pub fn slot_bucket(slot_count: u32, buckets: &BucketSet) -> Bucket {
    let count = f64::from(slot_count);
    if count > buckets.last() {
        return Bucket::Overflow;
    }
    let idx = buckets
        .thresholds
        .iter()
        .rposition(|&t| t <= count)
        .unwrap_or(0);
    Bucket::Threshold(idx)
}

/// Inclusive upper bound: a percentage maps to the smallest threshold at or above it.
///
/// Near-zero percentages map to the first bucket.
pub fn liquidity_bucket(liquidity_pct: f64, buckets: &BucketSet) -> Bucket {
    if liquidity_pct < LIQUIDITY_EPSILON_PERCENT {
        return Bucket::Threshold(0);
    }
    buckets
        .thresholds
        .iter()
        .position(|&t| t != 0.0 && liquidity_pct <= t)
        .map(Bucket::Threshold)
        .unwrap_or(Bucket::Overflow)
}

/// Display label for a slot bucket: `0`, `1`, `3-5`, `> 400`.
pub fn slot_label(bucket: Bucket, buckets: &BucketSet) -> String {
    let t = &buckets.thresholds;
    match bucket {
        Bucket::Overflow => format!("> {}", buckets.last()),
        Bucket::Threshold(0) => format!("{}", t[0]),
        Bucket::Threshold(i) => {
            let start = t[i - 1] + 1.0;
            if start >= t[i] {
                format!("{}", t[i])
            } else {
                format!("{}-{}", start, t[i])
            }
        }
    }
}

/// Display label for a liquidity bucket: `~0%`, `>0-0.5%`, `>0.5-1%`, `> 95%`.
pub fn liquidity_label(bucket: Bucket, buckets: &BucketSet) -> String {
    let t = &buckets.thresholds;
    match bucket {
        Bucket::Overflow => format!("> {}%", buckets.last()),
        Bucket::Threshold(i) if t[i] == 0.0 => "~0%".to_string(),
        Bucket::Threshold(0) => format!("{}%", t[0]),
        Bucket::Threshold(i) => format!(">{}-{}%", t[i - 1], t[i]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> BucketSet {
        BucketSet::new(vec![0.0, 1.0, 2.0, 5.0, 10.0]).unwrap()
    }

    fn liquidity() -> BucketSet {
        BucketSet::new(vec![0.0, 0.5, 1.0, 2.0, 5.0]).unwrap()
    }

    #[test]
    fn test_slot_bucket_exact_and_floor() {
        let b = slots();
        assert_eq!(slot_bucket(0, &b), Bucket::Threshold(0));
        assert_eq!(slot_bucket(3, &b), Bucket::Threshold(2));
        assert_eq!(slot_bucket(5, &b), Bucket::Threshold(3));
        assert_eq!(slot_bucket(10, &b), Bucket::Threshold(4));
        assert_eq!(slot_bucket(11, &b), Bucket::Overflow);
    }

    #[test]
    fn test_slot_bucket_below_first_threshold() {
        let b = BucketSet::new(vec![2.0, 4.0]).unwrap();
        assert_eq!(slot_bucket(1, &b), Bucket::Threshold(0));
    }

    #[test]
    fn test_liquidity_bucket_upper_bound() {
        let b = liquidity();
        assert_eq!(liquidity_bucket(0.0, &b), Bucket::Threshold(0));
        assert_eq!(liquidity_bucket(0.0009, &b), Bucket::Threshold(0));
        assert_eq!(liquidity_bucket(0.0015, &b), Bucket::Threshold(1));
        assert_eq!(liquidity_bucket(0.5, &b), Bucket::Threshold(1));
        assert_eq!(liquidity_bucket(0.7, &b), Bucket::Threshold(2));
        assert_eq!(liquidity_bucket(5.0, &b), Bucket::Threshold(4));
        assert_eq!(liquidity_bucket(6.0, &b), Bucket::Overflow);
    }

    #[test]
    fn test_rejects_unsorted_thresholds() {
        assert!(BucketSet::new(vec![0.0, 2.0, 1.0]).is_err());
        assert!(BucketSet::new(vec![1.0, 1.0]).is_err());
        assert!(BucketSet::new(vec![]).is_err());
    }

    #[test]
    fn test_slot_labels() {
        let b = BucketSet::new(vec![0.0, 1.0, 2.0, 5.0, 10.0, 400.0]).unwrap();
        let labels: Vec<String> = b.buckets().map(|x| slot_label(x, &b)).collect();
        assert_eq!(labels, vec!["0", "1", "2", "3-5", "6-10", "11-400", "> 400"]);
    }

    #[test]
    fn test_liquidity_labels() {
        let b = liquidity();
        let labels: Vec<String> = b.buckets().map(|x| liquidity_label(x, &b)).collect();
        assert_eq!(labels, vec!["~0%", ">0-0.5%", ">0.5-1%", ">1-2%", ">2-5%", "> 5%"]);
    }

    #[test]
    fn test_bucket_slots_cover_all_buckets() {
        let b = slots();
        let positions: Vec<usize> = b.buckets().map(|x| b.slot(x)).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(b.len(), 6);
        assert!(!b.is_empty());
    }
}
