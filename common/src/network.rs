//! # Network Models
//!
//! Value objects describing a host as the discovery subsystem reports it.

pub mod host;
pub mod location;
pub mod mac;
