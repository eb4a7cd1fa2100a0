use std::{sync::Arc, time::Duration};

use tokio::time::sleep;

use crate::{domain::Destination, messaging::port::MessagingPort, store::TrackedAddressStore};

/// Pause after each successful send.
pub const DEFAULT_RELAY_DELAY: Duration = Duration::from_millis(1000);

/// Outcome counters for one dispatched batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Candidates delivered to at least one destination.
    pub relayed: usize,
    /// Candidates already tracked when reached.
    pub skipped: usize,
    /// Candidates for which every destination failed.
    pub failed: usize,
}

/// Sends new candidate addresses to outbound destinations.
#[derive(Clone)]
pub struct RelayDispatcher {
    messenger: Arc<dyn MessagingPort>,
    delay: Duration,
}

impl RelayDispatcher {
    pub fn new(messenger: Arc<dyn MessagingPort>) -> Self {
        Self::with_delay(messenger, DEFAULT_RELAY_DELAY)
    }

    pub fn with_delay(messenger: Arc<dyn MessagingPort>, delay: Duration) -> Self {
        Self { messenger, delay }
    }

    /// Relay each untracked candidate to every destination, in order.
    ///
    /// The tracked check runs once per candidate before its destinations are
    /// tried, so a duplicate later in the same batch is skipped once the first
    /// occurrence went out. A send failure only affects that one destination;
    /// a candidate with no successful send stays untracked and will be retried
    /// the next time it shows up.
    pub async fn dispatch(
        &self,
        candidates: &[String],
        destinations: &[Destination],
        store: &TrackedAddressStore,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for address in candidates {
            if store.is_tracked(address) {
                tracing::debug!(
                    platform = %store.platform(),
                    %address,
                    "already tracked, skipping"
                );
                report.skipped += 1;
                continue;
            }

            let mut delivered = false;
            for destination in destinations {
                match self.messenger.send_text(destination, address).await {
                    Ok(()) => {
                        tracing::info!(
                            platform = %store.platform(),
                            %address,
                            %destination,
                            "relayed address"
                        );
                        store.record_if_absent(address);
                        delivered = true;
                        if !self.delay.is_zero() {
                            sleep(self.delay).await;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(%address, %destination, error = %e, "relay failed");
                    }
                }
            }

            if delivered {
                report.relayed += 1;
            } else {
                report.failed += 1;
            }
        }

        report
    }
}
