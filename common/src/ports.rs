//! # Ports
//!
//! Traits isolating the bridge from the infrastructure around it.
//!
//! * [`HostEventSource`] and [`HostListener`] face the discovery side.
//!   The source drives the bridge by invoking registered listeners.
//! * [`NotificationTransport`] faces the vCPE manager. The bridge drives it.
//!
//! Concrete implementations live in `vcpe-core` (and in test doubles).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{RegistrationError, TransportError};
use crate::event::HostEvent;
use crate::notification::ProbeReply;

/// Handle returned by [`HostEventSource::add_listener`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Capability to receive host events.
///
/// Implementations must absorb their own failures: nothing may escape back
/// into the dispatching source.
#[async_trait]
pub trait HostListener: Send + Sync {
    async fn on_event(&self, event: HostEvent);
}

/// Capability to register listeners for host events.
///
/// After `remove_listener` returns, the source must not start any new
/// dispatch to that listener. Calls already in progress may finish.
pub trait HostEventSource: Send + Sync {
    fn add_listener(&self, listener: Arc<dyn HostListener>) -> Result<ListenerId, RegistrationError>;

    /// Returns `false` when the id was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

/// One-shot HTTP exchanges against the vCPE manager.
///
/// `path` is relative to the configured base URL. A completed exchange yields
/// its status code whatever the value; only network level problems are errors.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn post_json(&self, path: &str, body: Vec<u8>) -> Result<u16, TransportError>;

    async fn get(&self, path: &str) -> Result<ProbeReply, TransportError>;
}
