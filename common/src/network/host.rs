use pnet::util::MacAddr;

use crate::network::location::HostLocation;

/// A network attached endpoint as seen by the discovery subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub mac: MacAddr,
    /// Current attachment point. May be missing, typically for removed hosts.
    pub location: Option<HostLocation>,
}

impl Host {
    pub fn new(mac: MacAddr, location: HostLocation) -> Self {
        Self {
            mac,
            location: Some(location),
        }
    }

    pub fn detached(mac: MacAddr) -> Self {
        Self {
            mac,
            location: None,
        }
    }
}

