//! Fixed-interval scheduler.
//!
//! Runs a job once immediately, then on every tick of a fixed-period
//! ticker, until shutdown. The job is awaited before the ticker is polled
//! again, so runs never overlap. Ticks missed while a run was slow collapse
//! into one overdue tick that fires right away; later ticks land back on
//! the configured period grid.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Drives a job at a fixed period.
#[derive(Debug, Clone, Copy)]
pub struct PollScheduler {
    interval: Duration,
}

impl PollScheduler {
    /// Create a scheduler.
    ///
    /// # Panics
    ///
    /// `run` panics if `interval` is zero.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `job` until `shutdown` changes. Returns the number of runs.
    ///
    /// A run in progress is finished before shutdown is observed.
    pub async fn run<F, Fut>(&self, mut shutdown: watch::Receiver<bool>, mut job: F) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval_ms = self.interval.as_millis() as u64, "scheduler started");

        let mut runs = 0;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    job().await;
                    runs += 1;
                }
                _ = shutdown.changed() => {
                    info!(runs, "scheduler shutting down");
                    break;
                }
            }
        }
        runs
    }
}
