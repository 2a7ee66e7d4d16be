//! # Error Taxonomy
//!
//! Every failure the bridge can observe, grouped by where it is handled:
//!
//! * [`RegistrationError`] and [`ConfigError`] are fatal and surface from startup.
//! * [`MalformedEventError`] and [`TransportError`] are per-event. They are
//!   logged by the handler and never leave it.
//! * [`EventDecodeError`] belongs to the wire boundary where raw event
//!   records are turned into [`crate::event::HostEvent`]s.

use thiserror::Error;

use crate::event::HostEventKind;

/// The event source refused a listener.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("event source has been shut down")]
    SourceClosed,
}

/// A host event that cannot be turned into a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEventError {
    #[error("host {mac} has no attachment point")]
    MissingLocation { mac: String },
    #[error("{kind} events do not produce notifications")]
    NotAnAddition { kind: HostEventKind },
}

/// Network level failure of one HTTP exchange.
///
/// Carries the request path so a log line alone is enough to tell which call broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to {path} timed out: {message}")]
    Timeout { path: String, message: String },
    #[error("could not connect for {path}: {message}")]
    Connect { path: String, message: String },
    #[error("request to {path} failed: {message}")]
    Request { path: String, message: String },
    #[error("could not encode body for {path}: {message}")]
    Encode { path: String, message: String },
}

impl TransportError {
    pub fn path(&self) -> &str {
        match self {
            TransportError::Timeout { path, .. }
            | TransportError::Connect { path, .. }
            | TransportError::Request { path, .. }
            | TransportError::Encode { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid vCPE manager URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("could not build HTTP client: {0}")]
    Client(String),
}

/// Failure to read a raw event record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventDecodeError {
    #[error("unrecognized host event kind '{0}'")]
    UnknownKind(String),
    #[error("invalid MAC address '{0}'")]
    InvalidMac(String),
    #[error("invalid host location '{0}'")]
    InvalidLocation(String),
}

/// Errors returned by the bridge lifecycle.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to register host listener: {0}")]
    Registration(#[from] RegistrationError),
}
