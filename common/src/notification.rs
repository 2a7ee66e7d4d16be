//! # Notifications
//!
//! What the bridge sends to the vCPE manager and what it learns back.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::error::{MalformedEventError, TransportError};
use crate::event::{HostEvent, HostEventKind};

/// Body of `POST /add_update_ue`.
///
/// Both fields are rendered when the payload is built, never later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub mac: String,
    pub location: String,
}

impl TryFrom<&HostEvent> for NotificationPayload {
    type Error = MalformedEventError;

    fn try_from(event: &HostEvent) -> Result<Self, Self::Error> {
        if event.kind != HostEventKind::Added {
            return Err(MalformedEventError::NotAnAddition { kind: event.kind });
        }

        let mac = event.subject.mac.to_string();
        let location = event
            .subject
            .location
            .as_ref()
            .ok_or_else(|| MalformedEventError::MissingLocation { mac: mac.clone() })?
            .to_string();

        Ok(NotificationPayload { mac, location })
    }
}

/// Result of exactly one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The HTTP exchange completed, whatever the status.
    Delivered { status: u16 },
    Failed(TransportError),
}

impl DeliveryOutcome {
    pub fn status(&self) -> Option<u16> {
        match self {
            DeliveryOutcome::Delivered { status } => Some(*status),
            DeliveryOutcome::Failed(_) => None,
        }
    }

    /// Completed with a 2xx status.
    pub fn is_success(&self) -> bool {
        matches!(self.status(), Some(200..=299))
    }
}

/// Response to the `GET /test` reachability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReply {
    pub status: u16,
    pub body: String,
}

/// Counters kept across the lifetime of a bridge.
#[derive(Debug, Default)]
pub struct DeliveryCounters {
    notified: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
    observed: AtomicU64,
}

impl DeliveryCounters {
    pub fn record(&self, outcome: &DeliveryOutcome) {
        let counter = match outcome {
            DeliveryOutcome::Delivered { .. } if outcome.is_success() => &self.notified,
            DeliveryOutcome::Delivered { .. } => &self.rejected,
            DeliveryOutcome::Failed(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_observed(&self) {
        self.observed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DeliveryStats {
        DeliveryStats {
            notified: self.notified.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            observed: self.observed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DeliveryCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// ADDED events answered with a 2xx status.
    pub notified: u64,
    /// ADDED events answered with any other status.
    pub rejected: u64,
    /// ADDED events whose request never completed.
    pub failed: u64,
    /// ADDED events that could not be turned into a payload.
    pub skipped: u64,
    /// MOVED, REMOVED and UPDATED events.
    pub observed: u64,
}

impl DeliveryStats {
    pub fn attempts(&self) -> u64 {
        self.notified + self.rejected + self.failed
    }
}
