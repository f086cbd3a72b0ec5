//! Scan results fan out to every connected stream client.

use crate::helpers::client::{EventStreamClient, get_json};
use crate::helpers::config::TestConfigBuilder;
use crate::helpers::daemon::spawn_daemon;

#[tokio::test]
async fn test_e2e_scan_reaches_all_stream_clients() {
    // Given: two connected stream clients
    let daemon = spawn_daemon(TestConfigBuilder::new().build()).await;
    let mut first = EventStreamClient::connect(daemon.addr).await;
    let mut second = EventStreamClient::connect(daemon.addr).await;

    assert_eq!(first.next_data().await.unwrap()["type"], "hello");
    assert_eq!(second.next_data().await.unwrap()["type"], "hello");

    // When: a third client requests a scan
    let scanned = get_json(daemon.addr, "/api/scan?identifier=com.finance.quickpay").await;

    // Then: both stream clients receive the identical payload
    for client in [&mut first, &mut second] {
        let event = client.next_data().await.unwrap();
        assert_eq!(event["type"], "scan");
        assert_eq!(event["payload"], scanned);
    }

    daemon.stop().await.expect("clean stop");
}

#[tokio::test]
async fn test_e2e_stream_preserves_publish_order() {
    let daemon = spawn_daemon(TestConfigBuilder::new().build()).await;
    let mut client = EventStreamClient::connect(daemon.addr).await;
    assert_eq!(client.next_data().await.unwrap()["type"], "hello");

    let identifiers = ["com.a.one", "com.b.two", "com.c.three"];
    for id in identifiers {
        let _ = get_json(daemon.addr, &format!("/api/scan?identifier={id}")).await;
    }

    for id in identifiers {
        let event = client.next_data().await.unwrap();
        assert_eq!(event["payload"]["package"], id);
    }

    daemon.stop().await.expect("clean stop");
}

#[tokio::test]
async fn test_e2e_named_events() {
    let config = TestConfigBuilder::new().named_events(true).build();
    let daemon = spawn_daemon(config).await;
    let mut client = EventStreamClient::connect(daemon.addr).await;

    assert_eq!(client.next_event_name().await.as_deref(), Some("hello"));

    daemon.stop().await.expect("clean stop");
}

#[tokio::test]
async fn test_e2e_idle_stream_receives_heartbeat() {
    // Given: one-second poll and heartbeat
    let config = TestConfigBuilder::new().heartbeat(1, 1).build();
    let daemon = spawn_daemon(config).await;
    let mut client = EventStreamClient::connect(daemon.addr).await;
    assert_eq!(client.next_data().await.unwrap()["type"], "hello");

    // Then: with nothing published, a heartbeat arrives
    let beat = client.next_data().await.unwrap();
    assert_eq!(beat["type"], "heartbeat");
    assert!(beat["ts"].is_string());

    daemon.stop().await.expect("clean stop");
}

#[tokio::test]
async fn test_e2e_disconnected_client_is_unsubscribed() {
    let daemon = spawn_daemon(TestConfigBuilder::new().heartbeat(1, 1).build()).await;
    let mut client = EventStreamClient::connect(daemon.addr).await;
    assert_eq!(client.next_data().await.unwrap()["type"], "hello");
    assert_eq!(daemon.bus.subscriber_count(), 1);

    drop(client);

    // the server notices the closed socket on its next write
    let mut remaining = 1;
    for _ in 0..50 {
        let _ = get_json(daemon.addr, "/api/scan?identifier=com.a.ping").await;
        remaining = daemon.bus.subscriber_count();
        if remaining == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
    assert_eq!(remaining, 0);

    daemon.stop().await.expect("clean stop");
}
