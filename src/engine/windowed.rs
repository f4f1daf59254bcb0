//! Cold-start aware rolling average over a multiple of a base window.

use super::{DecayingAccumulator, MetricsError};

/// Decayed sum normalized by the number of windows observed so far.
///
/// The divisor ramps from 1.0 up to `window_count` as time passes since `start_ts`,
/// so a young channel's first payments are not divided by a near-zero span.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedAverage {
    start_ts: f64,
    window_duration: f64,
    window_count: u32,
    aggregated: DecayingAccumulator,
}

impl WindowedAverage {
    pub fn new(start_ts: f64, window_duration: f64, window_count: u32) -> Self {
        Self {
            start_ts,
            window_duration,
            window_count,
            aggregated: DecayingAccumulator::new(window_duration * f64::from(window_count)),
        }
    }

    pub fn add_value(&mut self, delta: f64, now: f64) -> Result<f64, MetricsError> {
        self.aggregated.add_value(delta, now)
    }

    /// Number of (possibly fractional) windows elapsed since `start_ts`.
    pub fn windows_tracked(&self, now: f64) -> f64 {
        (now - self.start_ts) / self.window_duration
    }

    /// Divisor applied at `now`, bounded to `[1.0, window_count]`.
    pub fn divisor_at(&self, now: f64) -> f64 {
        self.windows_tracked(now)
            .max(1.0)
            .min(f64::from(self.window_count))
    }

    pub fn value_at(&mut self, now: f64) -> Result<f64, MetricsError> {
        let divisor = self.divisor_at(now);
        let decayed = self.aggregated.value_at(now)?;
        Ok(decayed / divisor)
    }
}
