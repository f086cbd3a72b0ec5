//! 설정 -- `apkwatch.toml` 파싱 및 런타임 설정 관리
//!
//! [`ApkwatchConfig`]가 최상위 설정 구조체이며, 각 컴포넌트는
//! 자신의 섹션만 읽습니다.
//!
//! # 설정 우선순위
//! 1. CLI 인자 (최우선)
//! 2. 환경변수 (`APKWATCH_STREAM_CHANNEL_CAPACITY=200`)
//! 3. 설정 파일 (`apkwatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), apkwatch_core::error::ApkwatchError> {
//! use apkwatch_core::config::ApkwatchConfig;
//!
//! let config = ApkwatchConfig::load("apkwatch.toml").await?;
//! let config = ApkwatchConfig::parse("[stream]\nheartbeat_interval_secs = 30")?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ApkwatchError, ConfigError};

/// 구독자별 채널 용량 상한
const MAX_CHANNEL_CAPACITY: usize = 10_000;

/// 최신 위협 피드에서 순환하는 식별자 목록
pub const DEFAULT_FEED_IDENTIFIERS: [&str; 6] = [
    "com.chatwave.secure",
    "com.finance.quickpay",
    "com.stream.playhub",
    "com.games.arcadia",
    "com.notes.cloudsync",
    "com.flashlight.ultra",
];

/// apkwatch 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApkwatchConfig {
    /// 로깅 및 프로세스 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// HTTP 리스너 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 이벤트 스트리밍 설정
    #[serde(default)]
    pub stream: StreamConfig,
    /// 최신 위협 피드 설정
    #[serde(default)]
    pub feed: FeedConfig,
    /// Prometheus 익스포터 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl ApkwatchConfig {
    /// TOML 파일을 읽고 환경변수 오버라이드를 적용한 뒤 검증합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ApkwatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 환경변수 오버라이드 없이 TOML 파일만 읽습니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ApkwatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ApkwatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ApkwatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ApkwatchError> {
        toml::from_str(toml_str).map_err(|e| {
            ApkwatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// `APKWATCH_{SECTION}_{FIELD}` 환경변수로 설정값을 오버라이드합니다.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "APKWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "APKWATCH_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.pid_file, "APKWATCH_GENERAL_PID_FILE");

        // Server
        override_string(&mut self.server.listen_addr, "APKWATCH_SERVER_LISTEN_ADDR");
        override_u16(&mut self.server.port, "APKWATCH_SERVER_PORT");
        override_string(&mut self.server.allow_origin, "APKWATCH_SERVER_ALLOW_ORIGIN");

        // Stream
        override_usize(
            &mut self.stream.channel_capacity,
            "APKWATCH_STREAM_CHANNEL_CAPACITY",
        );
        override_u64(
            &mut self.stream.poll_timeout_secs,
            "APKWATCH_STREAM_POLL_TIMEOUT_SECS",
        );
        override_u64(
            &mut self.stream.heartbeat_interval_secs,
            "APKWATCH_STREAM_HEARTBEAT_INTERVAL_SECS",
        );
        override_bool(&mut self.stream.named_events, "APKWATCH_STREAM_NAMED_EVENTS");

        // Feed
        override_usize(&mut self.feed.default_limit, "APKWATCH_FEED_DEFAULT_LIMIT");
        override_csv(&mut self.feed.identifiers, "APKWATCH_FEED_IDENTIFIERS");

        // Metrics
        override_bool(&mut self.metrics.enabled, "APKWATCH_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "APKWATCH_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "APKWATCH_METRICS_PORT");
    }

    /// 값의 범위와 형식을 검증합니다.
    pub fn validate(&self) -> Result<(), ApkwatchError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if let Err(e) = self.server.socket_addr() {
            return Err(invalid("server.listen_addr", e));
        }

        if self.server.allow_origin.trim().is_empty() {
            return Err(invalid(
                "server.allow_origin",
                "must be '*' or an origin such as https://example.com",
            ));
        }

        if self.stream.channel_capacity == 0 || self.stream.channel_capacity > MAX_CHANNEL_CAPACITY
        {
            return Err(invalid(
                "stream.channel_capacity",
                format!("must be between 1 and {MAX_CHANNEL_CAPACITY}"),
            ));
        }

        if self.stream.poll_timeout_secs == 0 {
            return Err(invalid("stream.poll_timeout_secs", "must be greater than 0"));
        }

        if self.stream.heartbeat_interval_secs == 0 {
            return Err(invalid(
                "stream.heartbeat_interval_secs",
                "must be greater than 0",
            ));
        }

        if self.feed.identifiers.is_empty() {
            return Err(invalid("feed.identifiers", "must not be empty"));
        }

        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(invalid("metrics.port", "must be greater than 0"));
            }
            if self.metrics.endpoint != "/metrics" {
                return Err(invalid("metrics.endpoint", "only '/metrics' is supported"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ApkwatchError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// PID 파일 경로 (빈 문자열이면 사용하지 않음)
    pub pid_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
            pid_file: String::new(),
        }
    }
}

/// HTTP 리스너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인드 주소
    pub listen_addr: String,
    /// 바인드 포트
    pub port: u16,
    /// CORS 허용 origin (`*`이면 모두 허용)
    pub allow_origin: String,
}

impl ServerConfig {
    /// `listen_addr:port`를 소켓 주소로 변환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.listen_addr, self.port)
            .parse()
            .map_err(|e| format!("invalid socket address: {e}"))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1".to_owned(),
            port: 8080,
            allow_origin: "*".to_owned(),
        }
    }
}

/// 이벤트 스트리밍 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// 구독자별 채널 용량
    pub channel_capacity: usize,
    /// 하트비트 시계를 확인하기 전 세션이 이벤트를 기다리는 시간
    pub poll_timeout_secs: u64,
    /// 유휴 스트림에서 하트비트 사이의 최소 간격
    pub heartbeat_interval_secs: u64,
    /// 각 `data:` 줄 앞에 `event: <type>` 줄을 붙일지 여부
    pub named_events: bool,
}

impl StreamConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 100,
            poll_timeout_secs: 5,
            heartbeat_interval_secs: 15,
            named_events: false,
        }
    }
}

/// 최신 위협 피드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// 요청에 `limit`이 없을 때 반환할 항목 수
    pub default_limit: usize,
    /// 피드를 구성하는 식별자 (순서 유지)
    pub identifiers: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: 6,
            identifiers: DEFAULT_FEED_IDENTIFIERS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

/// Prometheus 익스포터 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 익스포터 설치 여부
    pub enabled: bool,
    /// 익스포터 바인드 주소
    pub listen_addr: String,
    /// 익스포터 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9100,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = ApkwatchConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.stream.channel_capacity, 100);
        assert_eq!(config.stream.poll_timeout(), Duration::from_secs(5));
        assert_eq!(config.stream.heartbeat_interval(), Duration::from_secs(15));
        assert!(!config.stream.named_events);
        assert_eq!(config.feed.default_limit, 6);
        assert_eq!(config.feed.identifiers.len(), 6);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn default_config_passes_validation() {
        ApkwatchConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = ApkwatchConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.feed.identifiers[0], "com.chatwave.secure");
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[stream]
heartbeat_interval_secs = 30
"#;
        let config = ApkwatchConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.stream.heartbeat_interval_secs, 30);
        assert_eq!(config.stream.poll_timeout_secs, 5);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "pretty"
pid_file = "/run/apkwatch.pid"

[server]
listen_addr = "0.0.0.0"
port = 9000
allow_origin = "https://dash.example.com"

[stream]
channel_capacity = 32
poll_timeout_secs = 2
heartbeat_interval_secs = 10
named_events = true

[feed]
default_limit = 3
identifiers = ["com.a.b", "com.c.d"]

[metrics]
enabled = true
listen_addr = "0.0.0.0"
port = 9200
"#;
        let config = ApkwatchConfig::parse(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.allow_origin, "https://dash.example.com");
        assert_eq!(config.stream.channel_capacity, 32);
        assert!(config.stream.named_events);
        assert_eq!(config.feed.identifiers, vec!["com.a.b", "com.c.d"]);
        assert_eq!(config.metrics.port, 9200);
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = ApkwatchConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            ApkwatchError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = ApkwatchConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = ApkwatchConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_bad_listen_addr() {
        let mut config = ApkwatchConfig::default();
        config.server.listen_addr = "not an address".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("listen_addr"));
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let mut config = ApkwatchConfig::default();
        config.stream.channel_capacity = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("channel_capacity"));
    }

    #[test]
    fn validate_rejects_oversized_capacity() {
        let mut config = ApkwatchConfig::default();
        config.stream.channel_capacity = MAX_CHANNEL_CAPACITY + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeouts() {
        let mut config = ApkwatchConfig::default();
        config.stream.poll_timeout_secs = 0;
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("poll_timeout_secs")
        );

        let mut config = ApkwatchConfig::default();
        config.stream.heartbeat_interval_secs = 0;
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("heartbeat_interval_secs")
        );
    }

    #[test]
    fn validate_rejects_empty_feed() {
        let mut config = ApkwatchConfig::default();
        config.feed.identifiers.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("feed.identifiers"));
    }

    #[test]
    fn validate_checks_metrics_only_when_enabled() {
        let mut config = ApkwatchConfig::default();
        config.metrics.port = 0;
        config.validate().unwrap();

        config.metrics.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 직렬화된 테스트이므로 다른 스레드가 환경변수를 읽지 않습니다.
        unsafe { std::env::set_var("TEST_APKWATCH_STR", "overridden") };
        override_string(&mut val, "TEST_APKWATCH_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_APKWATCH_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = false;
        // SAFETY: 직렬화된 테스트이므로 다른 스레드가 환경변수를 읽지 않습니다.
        unsafe { std::env::set_var("TEST_APKWATCH_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_APKWATCH_BOOL_BAD");
        assert!(!val);
        unsafe { std::env::remove_var("TEST_APKWATCH_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_csv_skips_blanks() {
        let mut val = vec!["a".to_owned()];
        // SAFETY: 직렬화된 테스트이므로 다른 스레드가 환경변수를 읽지 않습니다.
        unsafe { std::env::set_var("TEST_APKWATCH_CSV", "x, y,, z") };
        override_csv(&mut val, "TEST_APKWATCH_CSV");
        assert_eq!(val, vec!["x", "y", "z"]);
        unsafe { std::env::remove_var("TEST_APKWATCH_CSV") };
    }

    #[test]
    #[serial]
    fn env_overrides_apply_to_stream_section() {
        let mut config = ApkwatchConfig::default();
        // SAFETY: 직렬화된 테스트이므로 다른 스레드가 환경변수를 읽지 않습니다.
        unsafe { std::env::set_var("APKWATCH_STREAM_CHANNEL_CAPACITY", "250") };
        unsafe { std::env::set_var("APKWATCH_SERVER_PORT", "not-a-port") };
        config.apply_env_overrides();
        unsafe { std::env::remove_var("APKWATCH_STREAM_CHANNEL_CAPACITY") };
        unsafe { std::env::remove_var("APKWATCH_SERVER_PORT") };

        assert_eq!(config.stream.channel_capacity, 250);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_APKWATCH_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = ApkwatchConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = ApkwatchConfig::parse(&toml_str).unwrap();
        assert_eq!(config.stream.channel_capacity, parsed.stream.channel_capacity);
        assert_eq!(config.feed.identifiers, parsed.feed.identifiers);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = ApkwatchConfig::from_file("/nonexistent/path/apkwatch.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApkwatchError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
