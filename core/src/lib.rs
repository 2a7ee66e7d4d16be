//! # vcpe-core
//!
//! The event to notification pipeline.
//!
//! * [`bridge::NotificationBridge`] listens to a host event source and turns
//!   every ADDED event into one `POST /add_update_ue`.
//! * [`delivery::DeliveryClient`] performs that request over a
//!   [`vcpe_common::ports::NotificationTransport`].
//! * [`network::transport::ReqwestTransport`] is the HTTP implementation of it.
//! * [`bus::HostEventBus`] is an in-process event source.

pub mod bridge;
pub mod bus;
pub mod delivery;
pub mod network;

#[cfg(test)]
pub(crate) mod testing;
