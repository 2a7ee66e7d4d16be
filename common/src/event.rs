//! # Host Events
//!
//! The lifecycle notifications produced by the host discovery subsystem, and
//! the JSON record they travel as when fed in from outside the process.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::EventDecodeError;
use crate::network::host::Host;
use crate::network::location::HostLocation;
use crate::network::mac;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    Added,
    Moved,
    Removed,
    Updated,
}

impl HostEventKind {
    pub const ALL: [HostEventKind; 4] = [
        HostEventKind::Added,
        HostEventKind::Moved,
        HostEventKind::Removed,
        HostEventKind::Updated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostEventKind::Added => "ADDED",
            HostEventKind::Moved => "MOVED",
            HostEventKind::Removed => "REMOVED",
            HostEventKind::Updated => "UPDATED",
        }
    }
}

impl fmt::Display for HostEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostEventKind {
    type Err = EventDecodeError;

    /// Case-insensitive, with or without the `HOST_` prefix used by controllers
    /// (`"added"`, `"HOST_ADDED"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("HOST_").unwrap_or(&upper);

        HostEventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| EventDecodeError::UnknownKind(s.to_string()))
    }
}

/// A single, immutable host lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub kind: HostEventKind,
    pub subject: Host,
    /// Where the host was attached before a move.
    pub previous_location: Option<HostLocation>,
}

impl HostEvent {
    pub fn new(kind: HostEventKind, subject: Host) -> Self {
        Self {
            kind,
            subject,
            previous_location: None,
        }
    }

    pub fn added(subject: Host) -> Self {
        HostEvent::new(HostEventKind::Added, subject)
    }

    pub fn moved(subject: Host, previous_location: HostLocation) -> Self {
        Self {
            kind: HostEventKind::Moved,
            subject,
            previous_location: Some(previous_location),
        }
    }
}

/// Wire shape of a host event:
///
/// ```json
/// { "kind": "ADDED",
///   "subject": { "mac": "00:11:22:33:44:55",
///                "location": { "device": "of:0000000000000001", "port": 3 } } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct HostEventRecord {
    pub kind: String,
    pub subject: HostRecord,
    #[serde(default)]
    pub previous_location: Option<LocationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostRecord {
    pub mac: String,
    #[serde(default)]
    pub location: Option<LocationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationRecord {
    pub device: String,
    pub port: u64,
}

impl TryFrom<LocationRecord> for HostLocation {
    type Error = EventDecodeError;

    fn try_from(record: LocationRecord) -> Result<Self, Self::Error> {
        if record.device.trim().is_empty() {
            return Err(EventDecodeError::InvalidLocation(format!(
                "{}/{}",
                record.device, record.port
            )));
        }
        Ok(HostLocation::new(record.device, record.port))
    }
}

impl TryFrom<HostEventRecord> for HostEvent {
    type Error = EventDecodeError;

    fn try_from(record: HostEventRecord) -> Result<Self, Self::Error> {
        let kind: HostEventKind = record.kind.parse()?;
        let mac = mac::parse_mac(&record.subject.mac)?;
        let location = record
            .subject
            .location
            .map(HostLocation::try_from)
            .transpose()?;
        let previous_location = record
            .previous_location
            .map(HostLocation::try_from)
            .transpose()?;

        Ok(HostEvent {
            kind,
            subject: Host { mac, location },
            previous_location,
        })
    }
}
