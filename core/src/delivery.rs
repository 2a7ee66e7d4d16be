//! # Delivery
//!
//! One notification, one HTTP attempt. There is no retry and no backoff: a
//! failed attempt is reported as a [`DeliveryOutcome::Failed`] and dropped.

use std::sync::Arc;

use tracing::{error, info, warn};

use vcpe_common::config::Config;
use vcpe_common::error::{ConfigError, TransportError};
use vcpe_common::notification::{DeliveryOutcome, NotificationPayload, ProbeReply};
use vcpe_common::ports::NotificationTransport;

use crate::network::transport::ReqwestTransport;

/// Endpoint of the vCPE manager that registers an attached host.
pub const ADD_UPDATE_UE_PATH: &str = "/add_update_ue";
/// Reachability check endpoint.
pub const PROBE_PATH: &str = "/test";

#[derive(Clone)]
pub struct DeliveryClient {
    transport: Arc<dyn NotificationTransport>,
}

impl DeliveryClient {
    pub fn new(transport: Arc<dyn NotificationTransport>) -> Self {
        Self { transport }
    }

    /// Builds a client backed by [`ReqwestTransport`].
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let transport: ReqwestTransport = ReqwestTransport::from_config(cfg)?;
        info!("vCPE manager endpoint set to {}", transport.base_url());
        Ok(Self::new(Arc::new(transport)))
    }

    /// Sends `payload` as a JSON body to `path` and returns the status code.
    ///
    /// Any completed exchange is `Ok`, including 4xx and 5xx answers.
    pub async fn post(&self, path: &str, payload: &NotificationPayload) -> Result<u16, TransportError> {
        let body: Vec<u8> = serde_json::to_vec(payload).map_err(|e| TransportError::Encode {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        self.transport.post_json(path, body).await
    }

    /// Notifies the vCPE manager of an attached host.
    pub async fn deliver(&self, payload: &NotificationPayload) -> DeliveryOutcome {
        match self.post(ADD_UPDATE_UE_PATH, payload).await {
            Ok(status) if (200..300).contains(&status) => {
                info!(
                    "vCPE manager accepted {} at {} (status {status})",
                    payload.mac, payload.location
                );
                DeliveryOutcome::Delivered { status }
            }
            Ok(status) => {
                warn!(
                    "vCPE manager rejected {} at {} (status {status})",
                    payload.mac, payload.location
                );
                DeliveryOutcome::Delivered { status }
            }
            Err(e) => {
                error!("Notification for {} via {} failed: {e}", payload.mac, e.path());
                DeliveryOutcome::Failed(e)
            }
        }
    }

    /// `GET /test` against the vCPE manager.
    pub async fn probe(&self) -> Result<ProbeReply, TransportError> {
        self.transport.get(PROBE_PATH).await
    }
}
