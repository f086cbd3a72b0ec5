//! 도메인 타입 -- 스코어링 엔진, 이벤트 버스, HTTP 계층이 공유
//!
//! [`RiskPayload`]는 스캔 요청마다 새로 만들어지며 이후 변경되지 않습니다.
//! JSON 필드명은 공개 HTTP 계약의 일부입니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 이 점수 이상이면 [`RiskLevel::Critical`]
pub const CRITICAL_THRESHOLD: u8 = 75;
/// 이 점수 이상이면 최소 [`RiskLevel::Elevated`]
pub const ELEVATED_THRESHOLD: u8 = 55;

/// 위험 점수에서 파생되는 심각도 구간
///
/// `Guarded < Elevated < Critical` 순서로 정렬됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// score < 55
    Guarded,
    /// 55 <= score < 75
    Elevated,
    /// score >= 75
    Critical,
}

impl RiskLevel {
    /// 점수를 심각도 구간으로 분류합니다.
    pub fn from_score(score: u8) -> Self {
        if score >= CRITICAL_THRESHOLD {
            Self::Critical
        } else if score >= ELEVATED_THRESHOLD {
            Self::Elevated
        } else {
            Self::Guarded
        }
    }

    /// 소문자 레이블 (메트릭 레이블 값으로 사용)
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Guarded => "guarded",
            Self::Elevated => "elevated",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guarded => write!(f, "Guarded"),
            Self::Elevated => write!(f, "Elevated"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 스캔 대상 애플리케이션의 대분류
///
/// 권한 템플릿과 대응 방안 문구를 고르는 데 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Media,
    Messaging,
    Finance,
    SystemPersonalization,
    Generic,
}

impl Profile {
    /// 분류 우선순위 순서의 전체 프로필
    pub const ALL: [Profile; 5] = [
        Profile::Media,
        Profile::Messaging,
        Profile::Finance,
        Profile::SystemPersonalization,
        Profile::Generic,
    ];
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Media => write!(f, "media"),
            Self::Messaging => write!(f, "messaging"),
            Self::Finance => write!(f, "finance"),
            Self::SystemPersonalization => write!(f, "system_personalization"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

/// 권한 하나와 그렇게 분류된 이유
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFinding {
    /// 정규화된 권한 이름 (예: `android.permission.SEND_SMS`)
    pub name: String,
    /// 사람이 읽을 수 있는 근거
    pub reason: String,
}

/// 권한 분류 결과 (두 목록 모두 템플릿 순서 유지)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionReport {
    pub dangerous: Vec<PermissionFinding>,
    pub normal: Vec<PermissionFinding>,
}

/// 위협 흐름 다이어그램에서 노드의 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowNodeKind {
    Source,
    Risk,
    Sink,
}

/// 사용자에게 보여주는 데이터 유출 경로의 한 단계
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatFlowNode {
    pub label: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: FlowNodeKind,
}

/// 식별자 하나에 대한 위험도 평가 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPayload {
    /// 정규화된 스캔 대상 식별자
    pub package: String,
    /// 파생된 표시 이름
    pub app_name: String,
    /// `[15, 98]` 범위의 점수
    pub risk_score: u8,
    /// 예: `"Privacy Risk 8.2 / 10"`
    pub risk_score_text: String,
    pub risk_level: RiskLevel,
    pub verdict: String,
    pub analysis_summary: String,
    pub permissions: PermissionReport,
    pub threat_flow: Vec<ThreatFlowNode>,
    /// 순서가 있는 대응 방안 목록
    pub actions: Vec<String>,
    pub usage_advice: String,
    pub generated_at: DateTime<Utc>,
}

impl RiskPayload {
    /// 위협 피드용 축약 형태로 변환합니다.
    pub fn to_feed_item(&self) -> ThreatFeedItem {
        ThreatFeedItem {
            package: self.package.clone(),
            risk_level: self.risk_level,
            risk_score: self.risk_score,
            summary: self.verdict.clone(),
            generated_at: self.generated_at,
        }
    }
}

impl fmt::Display for RiskPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) score={} level={}",
            self.app_name, self.package, self.risk_score, self.risk_level,
        )
    }
}

/// 최신 위협 피드의 항목 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatFeedItem {
    pub package: String,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}
