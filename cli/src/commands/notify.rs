use pnet::util::MacAddr;

use vcpe_common::config::Config;
use vcpe_common::event::HostEvent;
use vcpe_common::network::host::Host;
use vcpe_common::network::location::HostLocation;
use vcpe_common::notification::DeliveryOutcome;
use vcpe_core::bridge::{BridgeOptions, NotificationBridge};
use vcpe_core::delivery::DeliveryClient;

use crate::terminal::{colors, print};

/// Pushes one ADDED event through the bridge, as if the host had just been discovered.
pub async fn notify(mac: MacAddr, location: HostLocation, cfg: &Config) -> anyhow::Result<()> {
    let bridge = NotificationBridge::new(
        DeliveryClient::from_config(cfg)?,
        BridgeOptions { probe_on_start: false },
    );

    match bridge.handle(HostEvent::added(Host::new(mac, location))).await {
        Some(DeliveryOutcome::Delivered { status }) => {
            let color = if (200..300).contains(&status) { colors::PRIMARY } else { colors::ACCENT };
            print::aligned_line("Status", status, color);
            Ok(())
        }
        Some(DeliveryOutcome::Failed(e)) => Err(e.into()),
        None => anyhow::bail!("host event produced no notification"),
    }
}
