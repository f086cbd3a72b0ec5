//! Test configuration builder.

use std::io::Write;

use apkwatch_core::config::ApkwatchConfig;

/// Builder for test-friendly `ApkwatchConfig` instances.
///
/// Defaults: ephemeral port, no PID file, metrics disabled.
#[allow(dead_code)]
pub struct TestConfigBuilder {
    config: ApkwatchConfig,
}

#[allow(dead_code)]
impl TestConfigBuilder {
    pub fn new() -> Self {
        let mut config = ApkwatchConfig::default();
        config.general.pid_file = String::new();
        config.server.listen_addr = "127.0.0.1".to_owned();
        config.server.port = 0;
        config.metrics.enabled = false;
        Self { config }
    }

    pub fn pid_file(mut self, path: &str) -> Self {
        self.config.general.pid_file = path.to_owned();
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.stream.channel_capacity = capacity;
        self
    }

    pub fn heartbeat(mut self, poll_timeout_secs: u64, interval_secs: u64) -> Self {
        self.config.stream.poll_timeout_secs = poll_timeout_secs;
        self.config.stream.heartbeat_interval_secs = interval_secs;
        self
    }

    pub fn named_events(mut self, named: bool) -> Self {
        self.config.stream.named_events = named;
        self
    }

    pub fn feed_identifiers(mut self, identifiers: &[&str]) -> Self {
        self.config.feed.identifiers = identifiers.iter().map(|s| (*s).to_owned()).collect();
        self
    }

    pub fn build(self) -> ApkwatchConfig {
        self.config
    }

    /// Serializes the config to a temporary TOML file.
    pub fn write_temp_file(&self) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let body = toml::to_string(&self.config).expect("config serializes");
        file.write_all(body.as_bytes()).expect("write config");
        file
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
