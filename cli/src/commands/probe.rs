use anyhow::Context;
use tracing::warn;

use vcpe_common::config::Config;
use vcpe_core::delivery::DeliveryClient;

use crate::terminal::{colors, print};

pub async fn probe(cfg: &Config) -> anyhow::Result<()> {
    let client: DeliveryClient = DeliveryClient::from_config(cfg)?;
    let reply = client
        .probe()
        .await
        .with_context(|| format!("vCPE manager at {} is unreachable", cfg.vcpe_api_url))?;

    let status_color = if (200..300).contains(&reply.status) {
        colors::PRIMARY
    } else {
        warn!("Reachability check answered with status {}", reply.status);
        colors::FAILURE
    };

    print::aligned_line("Status", reply.status, status_color);
    print::aligned_line("Body", reply.body.trim(), colors::TEXT_DEFAULT);
    Ok(())
}
