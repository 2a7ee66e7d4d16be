#![cfg(test)]
use std::sync::Arc;
use std::time::{Duration, Instant};

use vcpe_common::config::Config;
use vcpe_common::error::TransportError;
use vcpe_common::event::{HostEvent, HostEventKind};
use vcpe_common::network::host::Host;
use vcpe_common::network::location::HostLocation;
use vcpe_common::network::mac::parse_mac;
use vcpe_common::notification::DeliveryOutcome;
use vcpe_core::bridge::NotificationBridge;
use vcpe_core::bus::HostEventBus;

use crate::support::http::{Behavior, StubServer, refused_url};

const OK: Behavior = Behavior::Respond { status: 200, body: "ok" };

fn config(url: String, probe_on_start: bool) -> Config {
    Config {
        vcpe_api_url: url,
        request_timeout: Duration::from_millis(300),
        probe_on_start,
    }
}

fn lab_host() -> Host {
    Host::new(
        parse_mac("00:11:22:33:44:55").unwrap(),
        HostLocation::new("of:0000000000000001", 3),
    )
}

/// The reference scenario: one host attaches, the manager receives exactly
/// one `POST /add_update_ue` carrying its MAC and attachment point.
#[tokio::test]
async fn added_host_reaches_vcpe_manager() {
    let server = StubServer::start(OK).await.unwrap();
    let bridge = NotificationBridge::from_config(&config(server.url(), true)).unwrap();
    let bus = Arc::new(HostEventBus::new());

    bridge.start(bus.clone()).await.unwrap();
    bus.publish(HostEvent::added(lab_host())).await;
    bridge.stop();

    let requests = server.requests();
    assert_eq!(requests.len(), 2, "expected probe and one notification: {requests:?}");
    assert_eq!((requests[0].method.as_str(), requests[0].path.as_str()), ("GET", "/test"));

    let post = &requests[1];
    assert_eq!(post.method, "POST");
    assert_eq!(post.path, "/add_update_ue");
    assert_eq!(post.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        post.body,
        r#"{"mac":"00:11:22:33:44:55","location":"of:0000000000000001/3"}"#
    );
    assert_eq!(bridge.stats().notified, 1);
}

#[tokio::test]
async fn non_added_events_send_nothing() {
    let server = StubServer::start(OK).await.unwrap();
    let bridge = NotificationBridge::from_config(&config(server.url(), false)).unwrap();
    let bus = Arc::new(HostEventBus::new());
    bridge.start(bus.clone()).await.unwrap();

    for kind in [HostEventKind::Moved, HostEventKind::Removed, HostEventKind::Updated] {
        bus.publish(HostEvent::new(kind, lab_host())).await;
    }

    assert!(server.requests().is_empty());
    assert_eq!(bridge.stats().observed, 3);
}

#[tokio::test]
async fn unexpected_status_is_not_a_failure() {
    let server = StubServer::start(Behavior::Respond { status: 500, body: "boom" })
        .await
        .unwrap();
    let bridge = NotificationBridge::from_config(&config(server.url(), false)).unwrap();

    let outcome = bridge.handle(HostEvent::added(lab_host())).await;

    assert_eq!(outcome, Some(DeliveryOutcome::Delivered { status: 500 }));
    assert_eq!(bridge.stats().rejected, 1);
    assert_eq!(server.posts().len(), 1);
}

#[tokio::test]
async fn unresponsive_manager_hits_request_timeout() {
    let server = StubServer::start(Behavior::Hang).await.unwrap();
    let bridge = NotificationBridge::from_config(&config(server.url(), false)).unwrap();

    let started = Instant::now();
    let outcome = bridge.handle(HostEvent::added(lab_host())).await;

    assert!(
        matches!(outcome, Some(DeliveryOutcome::Failed(TransportError::Timeout { ref path, .. })) if path == "/add_update_ue"),
        "unexpected outcome: {outcome:?}"
    );
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(bridge.stats().failed, 1);
}

#[tokio::test]
async fn unreachable_manager_does_not_stop_later_deliveries() {
    let refused = NotificationBridge::from_config(&config(refused_url().await.unwrap(), true)).unwrap();
    let bus = Arc::new(HostEventBus::new());

    // Failed probe must not fail startup.
    refused.start(bus.clone()).await.unwrap();
    bus.publish(HostEvent::added(lab_host())).await;
    assert_eq!(refused.stats().failed, 1);
    refused.stop();

    let server = StubServer::start(OK).await.unwrap();
    let healthy = NotificationBridge::from_config(&config(server.url(), false)).unwrap();
    healthy.start(bus.clone()).await.unwrap();
    bus.publish(HostEvent::added(lab_host())).await;

    assert_eq!(healthy.stats().notified, 1);
    assert_eq!(server.posts().len(), 1);
}

#[tokio::test]
async fn stopped_bridge_sends_nothing() {
    let server = StubServer::start(OK).await.unwrap();
    let bridge = NotificationBridge::from_config(&config(server.url(), false)).unwrap();
    let bus = Arc::new(HostEventBus::new());

    bridge.start(bus.clone()).await.unwrap();
    bridge.stop();
    let reached = bus.publish(HostEvent::added(lab_host())).await;

    assert_eq!(reached, 0);
    assert!(server.requests().is_empty());
}
