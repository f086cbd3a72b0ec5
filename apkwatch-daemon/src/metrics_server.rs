//! Prometheus exporter.
//!
//! Uses the built-in HTTP listener of `metrics-exporter-prometheus`; the
//! scrape endpoint runs on its own port, separate from the API server.

use std::net::SocketAddr;

use anyhow::Result;
use apkwatch_core::config::MetricsConfig;
use apkwatch_core::metrics as m;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

/// Installs the global recorder and starts the scrape listener.
///
/// Call at most once per process.
///
/// # Errors
///
/// - unsupported endpoint or malformed listen address
/// - socket binding fails
/// - a global recorder is already installed
pub fn install_metrics_recorder(config: &MetricsConfig) -> Result<()> {
    if config.endpoint != "/metrics" {
        return Err(anyhow::anyhow!(
            "unsupported metrics endpoint '{}': only '/metrics' is currently supported",
            config.endpoint
        ));
    }

    let addr = metrics_addr(config)?;

    if addr.ip().is_unspecified() {
        tracing::warn!(
            listen_addr = %addr,
            "metrics endpoint is exposed on all interfaces; restrict listen_addr in untrusted networks"
        );
    }

    tracing::info!(listen_addr = %addr, "installing Prometheus metrics recorder");

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(m::SCAN_DURATION_SECONDS.to_owned()),
            &m::SCAN_DURATION_BUCKETS,
        )
        .map_err(|e| anyhow::anyhow!("invalid histogram buckets: {}", e))?
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    m::describe_all();

    tracing::info!(listen_addr = %addr, "Prometheus metrics endpoint active");
    Ok(())
}

fn metrics_addr(config: &MetricsConfig) -> Result<SocketAddr> {
    format!("{}:{}", config.listen_addr, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid metrics listen address: {}", e))
}

/// Records the build-info gauge (always 1).
pub fn record_build_info() {
    metrics::gauge!(m::DAEMON_BUILD_INFO, "version" => env!("CARGO_PKG_VERSION")).set(1.0);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "build info recorded");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_custom_endpoint() {
        let config = MetricsConfig {
            enabled: true,
            endpoint: "/custom".to_owned(),
            ..MetricsConfig::default()
        };
        let err = install_metrics_recorder(&config).unwrap_err();
        assert!(err.to_string().contains("unsupported metrics endpoint"));
    }

    #[test]
    fn rejects_malformed_address() {
        let config = MetricsConfig {
            enabled: true,
            listen_addr: "not-an-ip".to_owned(),
            ..MetricsConfig::default()
        };
        let err = install_metrics_recorder(&config).unwrap_err();
        assert!(err.to_string().contains("invalid metrics listen address"));
    }

    #[test]
    fn metrics_addr_joins_host_and_port() {
        let addr = metrics_addr(&MetricsConfig::default()).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:9100");
    }

    #[test]
    fn build_info_without_recorder_is_noop() {
        record_build_info();
    }
}
