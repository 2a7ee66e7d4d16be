//! # Notification Bridge
//!
//! Binds to a [`HostEventSource`] and forwards host attachments to the vCPE
//! manager.
//!
//! Every ADDED event yields exactly one `POST /add_update_ue`. MOVED, REMOVED
//! and UPDATED events are only logged. Building the payload and delivering it
//! form a critical section shared by the whole bridge, so at most one
//! notification is in flight and they leave in the order the handler was
//! entered. A slow vCPE manager therefore holds back every later event, for
//! at most the request timeout each.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{info, warn};

use vcpe_common::config::Config;
use vcpe_common::error::{BridgeError, ConfigError};
use vcpe_common::event::{HostEvent, HostEventKind};
use vcpe_common::notification::{DeliveryCounters, DeliveryOutcome, DeliveryStats, NotificationPayload};
use vcpe_common::ports::{HostEventSource, HostListener, ListenerId};

use crate::delivery::DeliveryClient;

#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeOptions {
    /// Issue `GET /test` once registered. Only logged, never fatal.
    pub probe_on_start: bool,
}

impl From<&Config> for BridgeOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            probe_on_start: cfg.probe_on_start,
        }
    }
}

pub struct NotificationBridge {
    handler: Arc<BridgeHandler>,
    options: BridgeOptions,
    registrations: Mutex<Vec<(Arc<dyn HostEventSource>, ListenerId)>>,
}

impl NotificationBridge {
    pub fn new(delivery: DeliveryClient, options: BridgeOptions) -> Self {
        Self {
            handler: Arc::new(BridgeHandler {
                delivery,
                serial: tokio::sync::Mutex::new(()),
                counters: DeliveryCounters::default(),
            }),
            options,
            registrations: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(DeliveryClient::from_config(cfg)?, BridgeOptions::from(cfg)))
    }

    /// Registers the bridge's handler with `source`.
    ///
    /// Calling it twice registers the handler twice.
    pub async fn start(&self, source: Arc<dyn HostEventSource>) -> Result<(), BridgeError> {
        info!("Starting vCPE notification bridge");

        let id: ListenerId = source.add_listener(self.handler.clone())?;
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((source, id));

        if self.options.probe_on_start {
            self.probe().await;
        }

        info!("Started vCPE notification bridge");
        Ok(())
    }

    /// Unregisters the handler from every source it was started on.
    ///
    /// A delivery already in flight is not cancelled.
    pub fn stop(&self) {
        let registrations: Vec<(Arc<dyn HostEventSource>, ListenerId)> = self
            .registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        if registrations.is_empty() {
            return;
        }
        for (source, id) in registrations {
            source.remove_listener(id);
        }
        info!("Stopped vCPE notification bridge");
    }

    /// Processes one event directly, returning the delivery outcome if a
    /// notification was attempted.
    pub async fn handle(&self, event: HostEvent) -> Option<DeliveryOutcome> {
        self.handler.handle(event).await
    }

    /// The listener registered by [`NotificationBridge::start`].
    pub fn listener(&self) -> Arc<dyn HostListener> {
        self.handler.clone()
    }

    pub fn stats(&self) -> DeliveryStats {
        self.handler.counters.snapshot()
    }

    async fn probe(&self) {
        match self.handler.delivery.probe().await {
            Ok(reply) => info!(
                "vCPE manager reachable (status {}): {}",
                reply.status,
                reply.body.trim()
            ),
            Err(e) => warn!("vCPE manager reachability check failed: {e}"),
        }
    }
}

struct BridgeHandler {
    delivery: DeliveryClient,
    serial: tokio::sync::Mutex<()>,
    counters: DeliveryCounters,
}

impl BridgeHandler {
    async fn handle(&self, event: HostEvent) -> Option<DeliveryOutcome> {
        let mac = event.subject.mac;
        let location: String = event
            .subject
            .location
            .as_ref()
            .map_or_else(|| "unknown".to_string(), |l| l.to_string());

        match event.kind {
            HostEventKind::Added => {
                info!("Host ADDED event: {mac} at {location}");
                self.notify(&event).await
            }
            HostEventKind::Moved => {
                match &event.previous_location {
                    Some(previous) => info!("Host MOVED event: {mac} from {previous} to {location}"),
                    None => info!("Host MOVED event: {mac} to {location}"),
                }
                self.counters.record_observed();
                None
            }
            HostEventKind::Removed => {
                info!("Host REMOVED event: {mac}");
                self.counters.record_observed();
                None
            }
            HostEventKind::Updated => {
                info!("Host UPDATED event: {mac} at {location}");
                self.counters.record_observed();
                None
            }
        }
    }

    async fn notify(&self, event: &HostEvent) -> Option<DeliveryOutcome> {
        let _serial = self.serial.lock().await;

        let payload: NotificationPayload = match NotificationPayload::try_from(event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Skipping host event: {e}");
                self.counters.record_skipped();
                return None;
            }
        };

        let outcome: DeliveryOutcome = self.delivery.deliver(&payload).await;
        self.counters.record(&outcome);
        Some(outcome)
    }
}

#[async_trait]
impl HostListener for BridgeHandler {
    async fn on_event(&self, event: HostEvent) {
        self.handle(event).await;
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
