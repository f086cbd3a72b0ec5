//! Graceful shutdown with open stream connections.

use crate::helpers::client::EventStreamClient;
use crate::helpers::config::TestConfigBuilder;
use crate::helpers::daemon::spawn_daemon;

#[tokio::test]
async fn test_e2e_shutdown_closes_open_streams() {
    // Given: a connected stream client
    let daemon = spawn_daemon(TestConfigBuilder::new().build()).await;
    let mut client = EventStreamClient::connect(daemon.addr).await;
    assert_eq!(client.next_data().await.unwrap()["type"], "hello");
    let bus = daemon.bus.clone();

    // When: the daemon is stopped
    daemon.stop().await.expect("clean stop");

    // Then: the stream ends and nothing stays subscribed
    client.wait_closed().await;
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn test_e2e_shutdown_without_clients() {
    let daemon = spawn_daemon(TestConfigBuilder::new().build()).await;
    daemon.stop().await.expect("clean stop");
}
