//! Invalid configuration is rejected before the daemon serves.

use std::path::Path;

use apkwatch_core::config::ApkwatchConfig;
use apkwatch_core::error::{ApkwatchError, ConfigError};
use apkwatch_daemon::orchestrator::Orchestrator;

use crate::helpers::config::TestConfigBuilder;

#[tokio::test]
async fn test_e2e_invalid_toml_syntax() {
    let err = ApkwatchConfig::parse("invalid = [[[toml").unwrap_err();
    assert!(matches!(
        err,
        ApkwatchError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[tokio::test]
async fn test_e2e_zero_channel_capacity() {
    let config = TestConfigBuilder::new().channel_capacity(0).build();
    let err = Orchestrator::build_from_config(config).await.err().unwrap();
    assert!(err.to_string().contains("channel_capacity"));
}

#[tokio::test]
async fn test_e2e_empty_feed_identifiers() {
    let config = TestConfigBuilder::new().feed_identifiers(&[]).build();
    let err = Orchestrator::build_from_config(config).await.err().unwrap();
    assert!(err.to_string().contains("feed.identifiers"));
}

#[tokio::test]
async fn test_e2e_nonexistent_config_path() {
    let err = Orchestrator::build(Path::new("/nonexistent/apkwatch.toml"))
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_e2e_config_file_round_trip() {
    // Given: a config written to disk
    let builder = TestConfigBuilder::new().named_events(true).heartbeat(2, 30);
    let file = builder.write_temp_file();

    // When: the daemon builds from that file
    let orchestrator = Orchestrator::build(file.path()).await.unwrap();

    // Then: the file settings are in effect
    assert!(orchestrator.config().stream.named_events);
    assert_eq!(orchestrator.config().stream.heartbeat_interval_secs, 30);
}
