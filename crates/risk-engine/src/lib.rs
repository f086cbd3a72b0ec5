//! 애플리케이션 식별자에 대한 결정적 프라이버시 위험도 스코어링
//!
//! # 모듈 구성
//!
//! - [`profile`]: 키워드 기반 분류 (`detect_profile`)
//! - [`naming`]: 표시 이름 (`display_name`)
//! - [`scoring`]: 시드 기반 점수 산출과 데모 허용 목록
//! - [`permissions`]: 프로필별 권한 템플릿
//! - [`actions`]: 대응 방안과 사용 권고
//! - [`engine`]: 페이로드 조립 (`compute_risk`)
//! - [`feed`]: 최신 위협 피드 (`threat_feed`)
//!
//! # 처리 흐름
//!
//! ```text
//! identifier --> normalize --> detect_profile ----------+
//!                    |                                  |
//!                    +--> demo? --yes--> score 82       |
//!                    |        \--no---> seeded score    |
//!                    v                                  v
//!               RiskLevel --> permissions / actions / advice --> RiskPayload
//! ```

pub mod actions;
pub mod engine;
pub mod feed;
pub mod naming;
pub mod permissions;
pub mod profile;
pub mod scoring;

pub use actions::{actions_for, usage_advice};
pub use engine::{DEFAULT_IDENTIFIER, compute_risk, compute_risk_at, normalize_identifier};
pub use feed::{ThreatFeed, build_feed, threat_feed};
pub use naming::display_name;
pub use permissions::permissions_for;
pub use profile::detect_profile;
