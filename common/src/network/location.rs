use std::fmt;
use std::str::FromStr;

use crate::error::EventDecodeError;

/// Attachment point of a host: the device it hangs off and the port on it.
///
/// Renders as `<device-id>/<port>`, e.g. `of:0000000000000001/3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostLocation {
    pub device_id: String,
    pub port: u64,
}

impl HostLocation {
    pub fn new(device_id: impl Into<String>, port: u64) -> Self {
        Self {
            device_id: device_id.into(),
            port,
        }
    }
}

impl fmt::Display for HostLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.port)
    }
}

impl FromStr for HostLocation {
    type Err = EventDecodeError;

    /// Parses `<device-id>/<port>`.
    ///
    /// The split happens on the last `/` so device identifiers may contain
    /// slashes of their own.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EventDecodeError::InvalidLocation(s.to_string());

        let (device_id, port_str) = s.trim().rsplit_once('/').ok_or_else(invalid)?;
        if device_id.is_empty() {
            return Err(invalid());
        }
        let port = port_str.parse::<u64>().map_err(|_| invalid())?;

        Ok(HostLocation::new(device_id, port))
    }
}
