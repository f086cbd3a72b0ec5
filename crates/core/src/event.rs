//! 스트림 이벤트 -- 스캔 핸들러와 클라이언트 사이 팬아웃의 기본 단위
//!
//! 모든 이벤트는 추적용 [`EventMetadata`]와 [`EventBody`]를 가지며,
//! 와이어로 직렬화되는 것은 [`EventBody`]뿐입니다:
//!
//! ```text
//! {"type":"hello","ts":"2026-01-01T00:00:00Z"}
//! {"type":"scan","payload":{...RiskPayload...}}
//! {"type":"heartbeat","ts":"2026-01-01T00:00:15Z"}
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RiskPayload;

// --- 모듈명 상수 ---

/// 스캔 엔드포인트 (scan 이벤트의 유일한 생산자)
pub const MODULE_SCAN_HANDLER: &str = "scan-handler";
/// 스트리밍 세션 매니저
pub const MODULE_STREAM_SESSION: &str = "stream-session";

// --- 이벤트 타입 상수 ---

/// 스트림 준비 완료 신호
pub const EVENT_TYPE_HELLO: &str = "hello";
/// 스캔 결과 브로드캐스트
pub const EVENT_TYPE_SCAN: &str = "scan";
/// 유휴 상태 keep-alive
pub const EVENT_TYPE_HEARTBEAT: &str = "heartbeat";

/// 이벤트 메타데이터 -- 모든 이벤트에 붙는 추적 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// 이벤트 생성 시각
    pub timestamp: SystemTime,
    /// 이벤트를 생성한 모듈명
    pub source_module: String,
    /// 이벤트를 유발한 요청과 연결하는 추적 ID
    pub trace_id: String,
}

impl EventMetadata {
    /// 기존 trace_id를 이어받는 메타데이터를 생성합니다.
    pub fn new(source_module: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source_module: source_module.into(),
            trace_id: trace_id.into(),
        }
    }

    /// 새 UUID v4 추적을 시작하는 메타데이터를 생성합니다.
    pub fn with_new_trace(source_module: impl Into<String>) -> Self {
        Self::new(source_module, uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for EventMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] source={} trace={}",
            unix_timestamp_str(self.timestamp),
            self.source_module,
            self.trace_id,
        )
    }
}

/// 버스를 통과하는 모든 이벤트의 공통 인터페이스
///
/// `tokio::mpsc` 채널을 건너갈 수 있도록 `Send + Sync + 'static`을 요구합니다.
pub trait Event: Send + Sync + 'static {
    /// 고유 이벤트 ID (UUID v4)
    fn event_id(&self) -> &str;

    /// 추적 메타데이터
    fn metadata(&self) -> &EventMetadata;

    /// 타입 태그 (`EVENT_TYPE_*` 상수 중 하나)
    fn event_type(&self) -> &str;
}

/// 스트림 이벤트의 와이어 본문, `type`으로 태깅됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventBody {
    /// 스트림이 준비되면 한 번 전송
    Hello { ts: DateTime<Utc> },
    /// 스캔 결과; 페이로드는 모든 구독자가 공유합니다
    Scan { payload: Arc<RiskPayload> },
    /// 중간 프록시의 타임아웃을 막기 위해 유휴 스트림에 전송
    Heartbeat { ts: DateTime<Utc> },
}

/// 스트리밍 클라이언트에게 전달되는 이벤트
///
/// 생성 후 불변입니다. 스캔 페이로드가 `Arc` 뒤에 있어 clone 비용이 작습니다.
#[derive(Debug, Clone)]
pub struct StreamEvent {
    /// 고유 이벤트 ID
    pub id: String,
    /// 추적 메타데이터
    pub metadata: EventMetadata,
    /// 직렬화되는 본문
    pub body: EventBody,
}

impl StreamEvent {
    /// 현재 시각이 찍힌 준비 완료 신호를 생성합니다.
    pub fn hello() -> Self {
        Self::build(
            EventBody::Hello { ts: Utc::now() },
            EventMetadata::with_new_trace(MODULE_STREAM_SESSION),
        )
    }

    /// 현재 시각이 찍힌 keep-alive를 생성합니다.
    pub fn heartbeat() -> Self {
        Self::build(
            EventBody::Heartbeat { ts: Utc::now() },
            EventMetadata::with_new_trace(MODULE_STREAM_SESSION),
        )
    }

    /// 새 추적을 시작하는 스캔 브로드캐스트를 생성합니다.
    pub fn scan(payload: Arc<RiskPayload>) -> Self {
        Self::build(
            EventBody::Scan { payload },
            EventMetadata::with_new_trace(MODULE_SCAN_HANDLER),
        )
    }

    fn build(body: EventBody, metadata: EventMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata,
            body,
        }
    }

    /// 와이어 본문을 한 줄 JSON 문서로 직렬화합니다.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.body)
    }
}

impl Event for StreamEvent {
    fn event_id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn event_type(&self) -> &str {
        match self.body {
            EventBody::Hello { .. } => EVENT_TYPE_HELLO,
            EventBody::Scan { .. } => EVENT_TYPE_SCAN,
            EventBody::Heartbeat { .. } => EVENT_TYPE_HEARTBEAT,
        }
    }
}

impl fmt::Display for StreamEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StreamEvent[{}] type={}",
            &self.id[..8.min(self.id.len())],
            self.event_type(),
        )?;
        if let EventBody::Scan { payload } = &self.body {
            write!(f, " package={} level={}", payload.package, payload.risk_level)?;
        }
        Ok(())
    }
}

fn unix_timestamp_str(time: SystemTime) -> String {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(duration) => format!("{}", duration.as_secs()),
        Err(_) => "unknown".to_owned(),
    }
}
