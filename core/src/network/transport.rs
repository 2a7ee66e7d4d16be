use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::debug;

use vcpe_common::config::Config;
use vcpe_common::error::{ConfigError, TransportError};
use vcpe_common::notification::ProbeReply;
use vcpe_common::ports::NotificationTransport;

const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP transport towards the vCPE manager.
///
/// Holds a single [`Client`] built at startup; every request through it is
/// bounded by the configured timeout.
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        if cfg.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        let base_url: Url = parse_base_url(&cfg.vcpe_api_url)?;
        let client: Client = build_client(cfg.request_timeout)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `path` to the base URL, keeping any path prefix the base carries.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl NotificationTransport for ReqwestTransport {
    async fn post_json(&self, path: &str, body: Vec<u8>) -> Result<u16, TransportError> {
        let url: String = self.endpoint(path);
        debug!("POST {url} ({} bytes)", body.len());

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| classify(path, e))?;

        Ok(response.status().as_u16())
    }

    async fn get(&self, path: &str) -> Result<ProbeReply, TransportError> {
        let url: String = self.endpoint(path);
        debug!("GET {url}");

        let response = self.client.get(&url).send().await.map_err(|e| classify(path, e))?;
        let status: u16 = response.status().as_u16();
        let body: String = response.text().await.map_err(|e| classify(path, e))?;

        Ok(ProbeReply { status, body })
    }
}

fn build_client(timeout: Duration) -> Result<Client, ConfigError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .map_err(|e| ConfigError::Client(e.to_string()))
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url: Url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }

    Ok(url)
}

fn classify(path: &str, err: reqwest::Error) -> TransportError {
    let path: String = path.to_string();
    let message: String = err.to_string();

    if err.is_timeout() {
        TransportError::Timeout { path, message }
    } else if err.is_connect() {
        TransportError::Connect { path, message }
    } else {
        TransportError::Request { path, message }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
