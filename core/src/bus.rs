//! # Host Event Bus
//!
//! In-process [`HostEventSource`]. Whoever owns the bus publishes events into
//! it; every registered listener receives them in registration order.
//!
//! The bus can be shared between tasks, so listeners may see concurrent
//! dispatches when several tasks publish at once.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use vcpe_common::error::RegistrationError;
use vcpe_common::event::HostEvent;
use vcpe_common::ports::{HostEventSource, HostListener, ListenerId};

struct Registration {
    id: ListenerId,
    listener: Arc<dyn HostListener>,
    /// Cleared on removal so a publish that already took its snapshot skips it.
    active: Arc<AtomicBool>,
}

#[derive(Default)]
struct BusState {
    closed: bool,
    registrations: Vec<Registration>,
}

#[derive(Default)]
pub struct HostEventBus {
    state: RwLock<BusState>,
    next_id: AtomicU64,
}

impl HostEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands `event` to every registered listener, one after the other.
    ///
    /// Returns how many listeners were invoked.
    pub async fn publish(&self, event: HostEvent) -> usize {
        let snapshot: Vec<(Arc<dyn HostListener>, Arc<AtomicBool>)> = {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            state
                .registrations
                .iter()
                .map(|r| (r.listener.clone(), r.active.clone()))
                .collect()
        };

        trace!("Dispatching {} event for {} to {} listener(s)", event.kind, event.subject.mac, snapshot.len());

        let mut reached: usize = 0;
        for (listener, active) in snapshot {
            if !active.load(Ordering::Acquire) {
                continue;
            }
            listener.on_event(event.clone()).await;
            reached += 1;
        }
        reached
    }

    pub fn listener_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .registrations
            .len()
    }

    /// Drops all listeners and refuses new ones.
    pub fn shutdown(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.closed = true;
        for registration in state.registrations.drain(..) {
            registration.active.store(false, Ordering::Release);
        }
        debug!("Host event bus shut down");
    }

    pub fn is_closed(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).closed
    }
}

impl HostEventSource for HostEventBus {
    fn add_listener(&self, listener: Arc<dyn HostListener>) -> Result<ListenerId, RegistrationError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Err(RegistrationError::SourceClosed);
        }

        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        state.registrations.push(Registration {
            id,
            listener,
            active: Arc::new(AtomicBool::new(true)),
        });
        debug!("Registered host listener {}", id.0);
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let Some(index) = state.registrations.iter().position(|r| r.id == id) else {
            return false;
        };

        let registration = state.registrations.remove(index);
        registration.active.store(false, Ordering::Release);
        debug!("Removed host listener {}", id.0);
        true
    }
}
