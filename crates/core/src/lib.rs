//! apkwatch 공통 구성 요소
//!
//! 워크스페이스의 다른 크레이트는 설정 모델, 에러 계층, 위험도 페이로드 타입,
//! 이벤트 버스로 전달되는 이벤트를 모두 이 크레이트에서 가져옵니다.
//!

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod types;

// --- 재export ---

// 에러
pub use error::{ApkwatchError, ConfigError, ServerError};

// 설정
pub use config::ApkwatchConfig;

// 이벤트
pub use event::{Event, EventBody, EventMetadata, StreamEvent};

// 도메인 타입
pub use types::{
    FlowNodeKind, PermissionFinding, PermissionReport, Profile, RiskLevel, RiskPayload,
    ThreatFeedItem, ThreatFlowNode,
};
