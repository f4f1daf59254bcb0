use std::fmt::Display;
use std::time::Duration;

/// Re-runs a job on a fixed interval until Ctrl-C or an optional run limit.
#[derive(Debug, Clone)]
pub struct PeriodicRunner {
    interval: Duration,
    max_runs: Option<u64>,
}

impl PeriodicRunner {
    pub fn new(interval: Duration, max_runs: Option<u64>) -> Self {
        Self { interval, max_runs }
    }

    /// Run `job` immediately and then once per interval.
    ///
    /// A failed run is logged and the next tick proceeds. Returns the number of runs
    /// attempted.
    pub async fn run<F, E>(&self, mut job: F) -> u64
    where
        F: FnMut(u64) -> Result<(), E>,
        E: Display,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut runs = 0u64;
        loop {
            if self.max_runs.is_some_and(|max| runs >= max) {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    runs += 1;
                    match job(runs) {
                        Ok(()) => tracing::info!(run = runs, "Periodic run complete"),
                        Err(e) => tracing::error!(run = runs, error = %e, "Periodic run failed"),
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!(runs, "Shutdown requested, stopping periodic runs");
                    break;
                }
            }
        }
        runs
    }
}
