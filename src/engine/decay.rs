//! Exponentially decaying running sum with lazy, access-driven decay.

use super::MetricsError;

/// Updates further in the past than this are rejected; closer ones are treated as jitter.
pub const CAUSALITY_TOLERANCE_SECS: f64 = 1.0;

/// A running sum that halves every `period / 2` seconds.
///
/// Decay is applied on access, so reads at the same timestamp are idempotent and the
/// result depends only on elapsed time, never on how often the value was read.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayingAccumulator {
    value: f64,
    last_update: Option<f64>,
    decay_rate: f64,
}

impl DecayingAccumulator {
    /// Create an accumulator whose value halves after `period_secs / 2` seconds.
    ///
    /// The half-life is deliberately half the period; size `period_secs` accordingly.
    pub fn new(period_secs: f64) -> Self {
        Self {
            value: 0.0,
            last_update: None,
            decay_rate: 0.5_f64.powf(2.0 / period_secs),
        }
    }

    /// Timestamp of the last decay step, if any.
    pub fn last_update(&self) -> Option<f64> {
        self.last_update
    }

    /// Decayed value as of `now`.
    ///
    /// The first call only anchors the clock. A timestamp up to
    /// [`CAUSALITY_TOLERANCE_SECS`] in the past returns the current value untouched.
    pub fn value_at(&mut self, now: f64) -> Result<f64, MetricsError> {
        let Some(last) = self.last_update else {
            self.last_update = Some(now);
            return Ok(self.value);
        };

        let elapsed = now - last;
        if elapsed < 0.0 {
            if -elapsed > CAUSALITY_TOLERANCE_SECS {
                return Err(MetricsError::CausalityViolation {
                    last_update: last,
                    attempted: now,
                });
            }
            return Ok(self.value);
        }

        self.value *= self.decay_rate.powf(elapsed);
        self.last_update = Some(now);
        Ok(self.value)
    }

    /// Decay to `now`, then add `delta`.
    pub fn add_value(&mut self, delta: f64, now: f64) -> Result<f64, MetricsError> {
        self.value_at(now)?;
        self.value += delta;
        self.last_update = Some(now);
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: f64 = 14.0 * 24.0 * 3600.0;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_first_read_anchors_without_decay() {
        let mut acc = DecayingAccumulator::new(PERIOD);
        assert_eq!(acc.value_at(1000.0).unwrap(), 0.0);
        assert_eq!(acc.last_update(), Some(1000.0));
    }

    #[test]
    fn test_half_life_is_half_period() {
        let mut acc = DecayingAccumulator::new(PERIOD);
        acc.add_value(1000.0, 0.0).unwrap();
        let v = acc.value_at(PERIOD / 2.0).unwrap();
        assert!(approx(v, 500.0), "got {v}");

        let v = acc.value_at(PERIOD).unwrap();
        assert!(approx(v, 250.0), "got {v}");
    }

    #[test]
    fn test_quarter_period_decay() {
        let mut acc = DecayingAccumulator::new(PERIOD);
        acc.add_value(1000.0, 0.0).unwrap();
        let v = acc.value_at(PERIOD / 4.0).unwrap();
        assert!(approx(v, 1000.0 * 0.5_f64.sqrt()), "got {v}");
    }

    #[test]
    fn test_repeated_reads_are_idempotent() {
        let mut acc = DecayingAccumulator::new(PERIOD);
        acc.add_value(1000.0, 0.0).unwrap();
        let first = acc.value_at(3600.0).unwrap();
        let second = acc.value_at(3600.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_timestamp_adds_are_linear() {
        let mut acc = DecayingAccumulator::new(PERIOD);
        acc.add_value(100.0, 50.0).unwrap();
        assert_eq!(acc.add_value(250.0, 50.0).unwrap(), 350.0);
    }

    #[test]
    fn test_jitter_within_tolerance_is_ignored() {
        let mut acc = DecayingAccumulator::new(PERIOD);
        acc.add_value(100.0, 1000.0).unwrap();
        assert_eq!(acc.value_at(999.5).unwrap(), 100.0);
        assert_eq!(acc.last_update(), Some(1000.0));

        // A jittered write moves the clock to its own timestamp.
        assert_eq!(acc.add_value(10.0, 999.0).unwrap(), 110.0);
        assert_eq!(acc.last_update(), Some(999.0));
    }

    #[test]
    fn test_tolerance_boundary_is_exactly_one_second() {
        let mut acc = DecayingAccumulator::new(PERIOD);
        acc.add_value(100.0, 1000.0).unwrap();

        assert_eq!(acc.value_at(1000.0 - CAUSALITY_TOLERANCE_SECS).unwrap(), 100.0);
        assert_eq!(acc.value_at(999.0).unwrap(), 100.0);
        assert!(matches!(
            acc.value_at(998.9999),
            Err(MetricsError::CausalityViolation { .. })
        ));
        assert_eq!(acc.last_update(), Some(1000.0));
    }

    #[test]
    fn test_out_of_order_update_is_rejected() {
        let mut acc = DecayingAccumulator::new(PERIOD);
        acc.add_value(100.0, 1000.0).unwrap();

        let err = acc.value_at(998.0).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::CausalityViolation { last_update, attempted }
                if last_update == 1000.0 && attempted == 998.0
        ));
        assert!(acc.add_value(5.0, 900.0).is_err());
    }

    #[test]
    fn test_value_decays_towards_zero() {
        let mut acc = DecayingAccumulator::new(100.0);
        acc.add_value(100_000_000.0, 0.0).unwrap();
        assert!(acc.value_at(100_000.0).unwrap() < 1e-9);
    }
}
