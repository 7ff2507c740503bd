//! Periodic flush of pending progression.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::services::ProgressionService;

pub struct FlushWorker {
    progression: Arc<ProgressionService>,
    period: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl FlushWorker {
    pub fn new(
        progression: Arc<ProgressionService>,
        period: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            progression,
            period,
            shutdown_rx,
        }
    }

    /// Runs until the shutdown signal flips. The final flush belongs to the
    /// caller so its error can be surfaced.
    pub async fn run(mut self) {
        info!(period_secs = self.period.as_secs(), "FlushWorker started");
        // First tick one period after start, not immediately.
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let flushed = self.progression.flush_due().await;
                    if flushed > 0 {
                        debug!(flushed, "periodic flush");
                    }
                    self.progression.locks().prune();
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("FlushWorker stopped");
    }
}
