//! # vcpe-common
//!
//! Shared vocabulary of the bridge: the host events consumed from the
//! discovery side, the notification sent to the vCPE manager, the error
//! taxonomy, the configuration and the port traits that the core and the
//! adapters meet at.

pub mod config;
pub mod error;
pub mod event;
pub mod network;
pub mod notification;
pub mod ports;
