//! 최신 위협 피드
//!
//! 고정 식별자 목록에 대한 [`compute_risk`]의 축약 결과입니다.
//! 피드를 만들어도 이벤트는 publish되지 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use apkwatch_core::types::ThreatFeedItem;

use crate::engine::compute_risk_at;

/// 피드 응답 본문
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatFeed {
    pub items: Vec<ThreatFeedItem>,
    pub generated_at: DateTime<Utc>,
}

/// 앞에서부터 `limit`개 식별자의 피드 항목 (목록 순서 유지)
pub fn threat_feed<S: AsRef<str>>(identifiers: &[S], limit: usize) -> Vec<ThreatFeedItem> {
    let now = Utc::now();
    identifiers
        .iter()
        .take(limit)
        .map(|id| compute_risk_at(id.as_ref(), now).to_feed_item())
        .collect()
}

/// 생성 시각을 붙인 [`threat_feed`]
pub fn build_feed<S: AsRef<str>>(identifiers: &[S], limit: usize) -> ThreatFeed {
    ThreatFeed {
        items: threat_feed(identifiers, limit),
        generated_at: Utc::now(),
    }
}
