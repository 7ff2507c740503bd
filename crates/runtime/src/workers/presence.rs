//! Periodic sweep of lapsed presence entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::events::{EventBus, GameEvent, PresenceEvent};
use crate::presence::{ExpiringStore, PresenceInfo};

pub struct PresenceSweeper {
    store: Arc<dyn ExpiringStore<PresenceInfo>>,
    clock: Arc<dyn Clock>,
    events: EventBus,
    period: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl PresenceSweeper {
    pub fn new(
        store: Arc<dyn ExpiringStore<PresenceInfo>>,
        clock: Arc<dyn Clock>,
        events: EventBus,
        period: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            store,
            clock,
            events,
            period,
            shutdown_rx,
        }
    }

    pub fn sweep(&self) -> usize {
        sweep_presence(self.store.as_ref(), self.clock.as_ref(), &self.events)
    }

    pub async fn run(mut self) {
        info!(period_secs = self.period.as_secs(), "PresenceSweeper started");
        // First tick one period after start, not immediately.
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep();
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("PresenceSweeper stopped");
    }
}

/// Remove expired entries once and announce each departure.
pub fn sweep_presence(
    store: &dyn ExpiringStore<PresenceInfo>,
    clock: &dyn Clock,
    events: &EventBus,
) -> usize {
    let expired = store.sweep_expired(clock.now());
    for key in &expired {
        debug!(key = %key, "presence expired");
        events.publish(GameEvent::Presence(PresenceEvent::Expired { key: key.clone() }));
    }
    expired.len()
}
