//! Test doubles shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use vcpe_common::error::TransportError;
use vcpe_common::event::HostEvent;
use vcpe_common::notification::ProbeReply;
use vcpe_common::ports::{HostListener, NotificationTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub body: String,
}

/// Marks in the order the transport saw them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Begin(String),
    End(String),
}

/// Transport that records every request instead of sending it.
///
/// Replies come from the scripted queue first, then fall back to the default
/// status.
pub struct RecordingTransport {
    default_status: u16,
    delay: Option<Duration>,
    replies: Mutex<VecDeque<Result<u16, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    probes: Mutex<Vec<String>>,
    marks: Mutex<Vec<Mark>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingTransport {
    pub fn answering(default_status: u16) -> Self {
        Self {
            default_status,
            delay: None,
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            probes: Mutex::new(Vec::new()),
            marks: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Holds every request open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_reply(&self, reply: Result<u16, TransportError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    pub fn marks(&self) -> Vec<Mark> {
        self.marks.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn post_json(&self, path: &str, body: Vec<u8>) -> Result<u16, TransportError> {
        let body = String::from_utf8(body).expect("payload should be utf-8");
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        self.marks.lock().unwrap().push(Mark::Begin(body.clone()));
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            body: body.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.default_status));

        self.marks.lock().unwrap().push(Mark::End(body));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }

    async fn get(&self, path: &str) -> Result<ProbeReply, TransportError> {
        self.probes.lock().unwrap().push(path.to_string());
        Ok(ProbeReply {
            status: self.default_status,
            body: "ok".to_string(),
        })
    }
}

/// Listener that only remembers what it was handed.
#[derive(Default)]
pub struct CollectingListener {
    seen: Mutex<Vec<HostEvent>>,
}

impl CollectingListener {
    pub fn seen(&self) -> Vec<HostEvent> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostListener for CollectingListener {
    async fn on_event(&self, event: HostEvent) {
        self.seen.lock().unwrap().push(event);
    }
}
