//! Daemon lifecycle: start, serve, stop.

use crate::helpers::client::{get, get_json};
use crate::helpers::config::TestConfigBuilder;
use crate::helpers::daemon::spawn_daemon;

#[tokio::test]
async fn test_e2e_daemon_serves_health_and_scan() {
    // Given: a running daemon
    let daemon = spawn_daemon(TestConfigBuilder::new().build()).await;

    // When / Then: health answers ok
    let health = get_json(daemon.addr, "/health").await;
    assert_eq!(health["status"], "ok");

    // When / Then: scan returns the demo payload
    let scan = get_json(daemon.addr, "/api/scan").await;
    assert_eq!(scan["risk_score"], 82);
    assert_eq!(scan["risk_level"], "Critical");

    daemon.stop().await.expect("clean stop");
}

#[tokio::test]
async fn test_e2e_feed_uses_configured_identifiers() {
    let config = TestConfigBuilder::new()
        .feed_identifiers(&["com.a.one", "com.b.two"])
        .build();
    let daemon = spawn_daemon(config).await;

    let feed = get_json(daemon.addr, "/api/threats/latest?limit=10").await;
    let packages: Vec<_> = feed["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["package"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(packages, vec!["com.a.one", "com.b.two"]);

    daemon.stop().await.expect("clean stop");
}

#[tokio::test]
async fn test_e2e_pid_file_written_and_removed() {
    // Given: a PID file path in a fresh directory
    let dir = tempfile::tempdir().unwrap();
    let pid_path = dir.path().join("run").join("apkwatch.pid");
    let config = TestConfigBuilder::new()
        .pid_file(&pid_path.display().to_string())
        .build();

    // When: the daemon is serving
    let daemon = spawn_daemon(config).await;
    let (status, _) = get(daemon.addr, "/health").await;
    assert_eq!(status, 200);

    // Then: the PID file holds our PID until shutdown
    let content = std::fs::read_to_string(&pid_path).unwrap();
    assert_eq!(content.trim(), std::process::id().to_string());

    daemon.stop().await.expect("clean stop");
    assert!(!pid_path.exists(), "PID file should be removed on shutdown");
}

#[tokio::test]
async fn test_e2e_existing_pid_file_blocks_start() {
    let dir = tempfile::tempdir().unwrap();
    let pid_path = dir.path().join("apkwatch.pid");
    std::fs::write(&pid_path, "4242\n").unwrap();
    let config = TestConfigBuilder::new()
        .pid_file(&pid_path.display().to_string())
        .build();

    let daemon = spawn_daemon(config).await;
    let result = tokio::time::timeout(crate::helpers::daemon::STOP_TIMEOUT, daemon.handle)
        .await
        .expect("serve_on should fail fast")
        .expect("task should not panic");

    let err = result.expect_err("second instance must not start");
    assert!(err.to_string().contains("4242"));
    assert!(pid_path.exists(), "foreign PID file must be left alone");
}
