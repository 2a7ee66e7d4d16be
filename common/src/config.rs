use std::time::Duration;

/// Request deadline applied to every outbound call when none is given.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Config {
    /// Base URL of the vCPE manager, e.g. `http://10.0.0.5:8000`.
    ///
    /// Request paths (`/add_update_ue`, `/test`) are appended to it.
    pub vcpe_api_url: String,
    /// Upper bound for a single HTTP exchange, connection setup included.
    pub request_timeout: Duration,
    /// Issue a `GET /test` reachability check when the bridge starts.
    ///
    /// The result is only logged.
    pub probe_on_start: bool,
}

impl Config {
    pub fn new(vcpe_api_url: impl Into<String>) -> Self {
        Self {
            vcpe_api_url: vcpe_api_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            probe_on_start: true,
        }
    }
}
