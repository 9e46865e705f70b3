use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::persistence::{AuctionStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The store transitioned this many auctions to Completed.
    Closed(u64),
    /// The store answered and nothing was due.
    Idle,
    /// Another sweep held the guard, so this trigger did nothing.
    Skipped,
}

/// Closes expired auctions on a fixed cadence.
///
/// The guard is owned by the instance: share one `Sweeper` (for example in
/// an `Arc`) between every caller that may trigger a sweep.
pub struct Sweeper {
    store: Arc<dyn AuctionStore>,
    interval: Duration,
    /// Upper bound on one store call; defaults to the interval.
    timeout: Duration,
    running: Mutex<()>,
}

impl Sweeper {
    pub fn new(store: Arc<dyn AuctionStore>, interval: Duration) -> Self {
        Sweeper {
            store,
            interval,
            timeout: interval,
            running: Mutex::new(()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn sweep(&self) -> Result<SweepOutcome, StoreError> {
        self.sweep_at(Utc::now()).await
    }

    /// One sweep as of `now`. Returns `Skipped` straight away if a sweep is
    /// already in flight on this instance. A store call that outlives the
    /// timeout is abandoned and reported as unavailable.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<SweepOutcome, StoreError> {
        let _guard = match self.running.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Previous sweep still running, skipping this one");
                return Ok(SweepOutcome::Skipped);
            }
        };

        info!("Checking for expired auctions, now = {}", now.to_rfc3339());
        let closed = tokio::time::timeout(self.timeout, self.store.close_expired(now))
            .await
            .map_err(|_| StoreError::Unavailable(format!("sweep timed out after {:?}", self.timeout)))??;
        if closed > 0 {
            info!("Closed auctions, count = {}", closed);
            Ok(SweepOutcome::Closed(closed))
        } else {
            info!("No auctions to close");
            Ok(SweepOutcome::Idle)
        }
    }

    /// Sweeps once immediately, then every `interval` until `cancel` fires.
    /// A sweep that has started is allowed to finish; failures are logged
    /// and retried on the next tick.
    pub async fn run(&self, cancel: CancellationToken) {
        info!("Starting auction sweeper, interval = {:?}", self.interval);
        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                // the first tick completes immediately
                _ = ticker.tick() => {
                    if let Err(err) = self.sweep().await {
                        error!("Error closing auctions: {}", err);
                    }
                }
            }
        }
        info!("Shutting down auction sweeper...");
    }
}
