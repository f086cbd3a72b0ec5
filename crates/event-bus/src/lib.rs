//! 프로세스 내 이벤트 팬아웃 -- 장기 연결 클라이언트 세션으로 스트림 이벤트 전달
//!
//! # 모듈 구성
//!
//! - [`bus`]: 구독자 레지스트리와 논블로킹 publish (`EventBus`)
//! - [`session`]: 하트비트를 포함한 클라이언트별 상태 머신 (`StreamSession`)
//!
//! # 아키텍처
//!
//! ```text
//! scan handler --publish--> EventBus --try_send--> Subscription --> StreamSession --> client
//!                              |                                        |
//!                              +-- evicts full/closed channels          +-- hello, heartbeats
//! ```

pub mod bus;
pub mod session;

pub use bus::{EventBus, PublishReport, Subscription, SubscriptionId};
pub use session::{CloseReason, SessionConfig, SessionState, StreamSession};
