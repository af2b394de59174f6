//! Periodic store liveness probe.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::LivenessConfig;
use crate::metrics;
use crate::song::SongStore;

/// The store failed too many pings in a row.
#[derive(Debug, Clone, Error)]
#[error("Store unreachable after {failures} consecutive failed pings: {last_error}")]
pub struct StoreUnreachable {
    pub failures: u32,
    pub last_error: String,
}

/// Pings the store on a fixed interval and gives up after a run of failures.
#[derive(Debug, Clone)]
pub struct LivenessMonitor {
    interval: Duration,
    max_failures: u32,
}

impl LivenessMonitor {
    pub fn new(interval: Duration, max_failures: u32) -> Self {
        Self {
            interval,
            max_failures: max_failures.max(1),
        }
    }

    pub fn from_config(config: &LivenessConfig) -> Self {
        Self::new(Duration::from_secs(config.interval_secs), config.max_failures)
    }

    /// Ping until `max_failures` consecutive pings fail.
    ///
    /// Only returns on failure; a successful ping resets the counter.
    pub async fn run(&self, store: Arc<dyn SongStore>) -> StoreUnreachable {
        info!(
            interval_secs = self.interval.as_secs(),
            max_failures = self.max_failures,
            "Liveness monitor started"
        );

        let mut failures: u32 = 0;

        loop {
            tokio::time::sleep(self.interval).await;

            match store.ping() {
                Ok(()) => {
                    if failures > 0 {
                        info!("Store reachable again after {} failed pings", failures);
                    } else {
                        debug!("Store ping ok");
                    }
                    failures = 0;
                }
                Err(e) => {
                    failures += 1;
                    warn!(
                        "Store ping failed ({}/{}): {}",
                        failures, self.max_failures, e
                    );

                    if failures >= self.max_failures {
                        metrics::LIVENESS_CONSECUTIVE_FAILURES.set(i64::from(failures));
                        error!("Store unreachable, giving up");
                        return StoreUnreachable {
                            failures,
                            last_error: e.to_string(),
                        };
                    }
                }
            }

            metrics::LIVENESS_CONSECUTIVE_FAILURES.set(i64::from(failures));
        }
    }
}
