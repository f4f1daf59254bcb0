//! Stable forward ordering for deterministic processing.

use crate::domain::ForwardEvent;

/// Sort forwards by timestamp, keeping input order for equal timestamps.
pub fn sort_forwards_by_time(forwards: &mut [ForwardEvent]) {
    forwards.sort_by_key(|f| f.timestamp);
}

/// Returns true if the forwards are already in non-decreasing timestamp order.
pub fn is_time_ordered(forwards: &[ForwardEvent]) -> bool {
    forwards.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimestampNs;

    fn fwd(ns: i64, chan_in: &str) -> ForwardEvent {
        ForwardEvent::new(TimestampNs::new(ns), chan_in, "out", 1000, 999, 1)
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let mut forwards = vec![fwd(2000, "a"), fwd(1000, "b"), fwd(1000, "c")];
        sort_forwards_by_time(&mut forwards);

        assert_eq!(forwards[0].chan_id_in.as_ref().unwrap().as_str(), "b");
        assert_eq!(forwards[1].chan_id_in.as_ref().unwrap().as_str(), "c");
        assert_eq!(forwards[2].chan_id_in.as_ref().unwrap().as_str(), "a");
        assert!(is_time_ordered(&forwards));
    }

    #[test]
    fn test_detects_unordered_input() {
        let forwards = vec![fwd(2000, "a"), fwd(1000, "b")];
        assert!(!is_time_ordered(&forwards));
    }
}
