use pnet::util::MacAddr;

use crate::error::EventDecodeError;

/// Parses a hardware address written as six hex octets.
///
/// Accepts `:` or `-` as separator and either letter case. The canonical
/// rendering is the [`MacAddr`] `Display` form: lower case, colon separated.
pub fn parse_mac(s: &str) -> Result<MacAddr, EventDecodeError> {
    let normalized: String = s.trim().replace('-', ":");
    if normalized.split(':').any(|octet| octet.len() != 2) {
        return Err(EventDecodeError::InvalidMac(s.to_string()));
    }
    normalized
        .parse::<MacAddr>()
        .map_err(|_| EventDecodeError::InvalidMac(s.to_string()))
}
