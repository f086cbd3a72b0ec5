//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름을 여기서 정의합니다. 각 컴포넌트는
//! 이 상수로 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `apkwatch_`
//! - 컴포넌트: `scan_`, `bus_`, `stream_`, `daemon_`
//! - 접미어: `_total` (counter), `_seconds` (histogram), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(apkwatch_core::metrics::BUS_EVENTS_PUBLISHED_TOTAL).increment(1);
//! ```

// --- 레이블 키 상수 ---

/// 심각도 구간 레이블 키 (guarded, elevated, critical)
pub const LABEL_LEVEL: &str = "level";

/// 프로필 레이블 키 (media, messaging, finance, system_personalization, generic)
pub const LABEL_PROFILE: &str = "profile";

// --- 스코어링 메트릭 ---

/// Scoring: 완료된 위험도 계산 수 (counter, labels: level, profile)
pub const SCAN_REQUESTS_TOTAL: &str = "apkwatch_scan_requests_total";

/// Scoring: 페이로드 계산 소요 시간 (histogram, 초)
pub const SCAN_DURATION_SECONDS: &str = "apkwatch_scan_duration_seconds";

// --- 이벤트 버스 메트릭 ---

/// Bus: publish 호출 수 (counter)
pub const BUS_EVENTS_PUBLISHED_TOTAL: &str = "apkwatch_bus_events_published_total";

/// Bus: 구독자별 전달 성공 수 (counter)
pub const BUS_DELIVERIES_TOTAL: &str = "apkwatch_bus_deliveries_total";

/// Bus: 채널이 가득 차거나 닫혀 제거된 구독자 수 (counter)
pub const BUS_SUBSCRIBERS_EVICTED_TOTAL: &str = "apkwatch_bus_subscribers_evicted_total";

/// Bus: 등록된 구독자 수 (gauge)
pub const BUS_SUBSCRIBERS: &str = "apkwatch_bus_subscribers";

// --- 스트리밍 세션 메트릭 ---

/// Stream: 열려 있는 스트리밍 세션 수 (gauge)
pub const STREAM_ACTIVE_SESSIONS: &str = "apkwatch_stream_active_sessions";

/// Stream: 전체 세션에서 전송한 하트비트 수 (counter)
pub const STREAM_HEARTBEATS_TOTAL: &str = "apkwatch_stream_heartbeats_total";

// --- 데몬 메트릭 ---

/// Daemon: 가동 시간 (gauge, 초)
pub const DAEMON_UPTIME_SECONDS: &str = "apkwatch_daemon_uptime_seconds";

/// Daemon: 빌드 정보 (gauge, 항상 1, label: version)
pub const DAEMON_BUILD_INFO: &str = "apkwatch_daemon_build_info";

// --- 히스토그램 버킷 ---

/// 스코어링 지연 시간 버킷 (초)
///
/// 1us ~ 10ms; 계산은 순수 함수이며 메모리 안에서 끝납니다.
pub const SCAN_DURATION_BUCKETS: [f64; 8] = [
    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.01,
];

/// 모든 메트릭의 HELP 텍스트를 등록합니다.
///
/// 전역 recorder 설치 후 한 번 호출합니다. recorder가 없어도
/// 호출해도 안전합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // Scoring
    describe_counter!(
        SCAN_REQUESTS_TOTAL,
        "Total number of risk payloads computed, by severity band and profile"
    );
    describe_histogram!(
        SCAN_DURATION_SECONDS,
        "Time to compute a single risk payload in seconds"
    );

    // Event bus
    describe_counter!(
        BUS_EVENTS_PUBLISHED_TOTAL,
        "Total number of events published on the event bus"
    );
    describe_counter!(
        BUS_DELIVERIES_TOTAL,
        "Total number of events enqueued to subscriber channels"
    );
    describe_counter!(
        BUS_SUBSCRIBERS_EVICTED_TOTAL,
        "Total number of subscribers removed because their channel was full or closed"
    );
    describe_gauge!(BUS_SUBSCRIBERS, "Number of registered subscribers");

    // Streaming sessions
    describe_gauge!(
        STREAM_ACTIVE_SESSIONS,
        "Number of streaming sessions currently open"
    );
    describe_counter!(
        STREAM_HEARTBEATS_TOTAL,
        "Total number of heartbeat events sent to idle streams"
    );

    // Daemon
    describe_gauge!(DAEMON_UPTIME_SECONDS, "apkwatch daemon uptime in seconds");
    describe_gauge!(
        DAEMON_BUILD_INFO,
        "Build information (always 1, with version label)"
    );
}
