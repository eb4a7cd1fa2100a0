//! Per-platform inbound glue: allow-list → extract → dispatch.
//!
//! Transport crates (Telegram, Discord) translate their client events into
//! [`InboundEvent`] and hand them to [`InboundAdapter::process`].

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    dispatch::{DispatchReport, RelayDispatcher},
    domain::{Destination, InboundEvent, SourcePlatform},
    extract::AddressExtractor,
    gating::AllowList,
    store::TrackedAddressStore,
};

pub struct InboundAdapter {
    platform: SourcePlatform,
    allow_list: AllowList,
    destinations: Vec<Destination>,
    extractor: AddressExtractor,
    dispatcher: RelayDispatcher,
    store: Arc<TrackedAddressStore>,
    // Held for a whole event so the store's check-then-record cannot interleave.
    serial: Mutex<()>,
}

impl InboundAdapter {
    pub fn new(
        platform: SourcePlatform,
        allow_list: AllowList,
        destinations: Vec<Destination>,
        extractor: AddressExtractor,
        dispatcher: RelayDispatcher,
        store: Arc<TrackedAddressStore>,
    ) -> Self {
        if destinations.is_empty() {
            tracing::warn!(
                %platform,
                "no relay destinations configured, messages will be ignored"
            );
        }
        Self {
            platform,
            allow_list,
            destinations,
            extractor,
            dispatcher,
            store,
            serial: Mutex::new(()),
        }
    }

    pub fn platform(&self) -> SourcePlatform {
        self.platform
    }

    pub fn store(&self) -> &Arc<TrackedAddressStore> {
        &self.store
    }

    /// Run one event through the pipeline.
    ///
    /// Returns `None` when the event is filtered out, there is nowhere to
    /// relay to, or the text carries no candidates.
    pub async fn handle_event(&self, event: &InboundEvent) -> Option<DispatchReport> {
        if self.destinations.is_empty() || !self.allow_list.permits(event) {
            return None;
        }

        let _guard = self.serial.lock().await;

        let candidates = self.extractor.extract(&event.text).await;
        if candidates.is_empty() {
            return None;
        }
        tracing::debug!(
            platform = %self.platform,
            channel = %event.channel_id,
            count = candidates.len(),
            "detected addresses"
        );

        let report = self
            .dispatcher
            .dispatch(&candidates, &self.destinations, &self.store)
            .await;
        tracing::info!(
            platform = %self.platform,
            relayed = report.relayed,
            skipped = report.skipped,
            failed = report.failed,
            tracked = self.store.len(),
            "processed message"
        );
        Some(report)
    }

    /// Event-handler boundary: runs [`Self::handle_event`] on its own task so
    /// a panic while processing one message is logged instead of taking the
    /// listener down.
    pub async fn process(self: &Arc<Self>, event: InboundEvent) -> Option<DispatchReport> {
        let this = Arc::clone(self);
        let platform = self.platform;
        match tokio::spawn(async move { this.handle_event(&event).await }).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(%platform, error = %e, "error processing message");
                None
            }
        }
    }
}
