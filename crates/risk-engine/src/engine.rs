//! 위험도 페이로드 조립

use std::time::Instant;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use tracing::debug;

use apkwatch_core::metrics as m;
use apkwatch_core::types::{FlowNodeKind, RiskLevel, RiskPayload, ThreatFlowNode};

use crate::actions::{actions_for, usage_advice};
use crate::naming::display_name;
use crate::permissions::permissions_for;
use crate::profile::detect_profile;
use crate::scoring::{BASE_SCORE, generated_score, is_known_demo, score_text};

/// 빈 식별자 대신 사용하는 기본값
pub const DEFAULT_IDENTIFIER: &str = "com.unknown.app";

/// 데모 페이로드의 표시 이름
pub const DEMO_APP_NAME: &str = "Calculator Plus";

pub const VERDICT: &str = "Excessive & dangerous permissions detected for core functionality.";

pub const ANALYSIS_SUMMARY: &str = "The requested permissions exceed what is expected for this app’s purpose, indicating potential data collection or misuse.";

/// 공백을 제거하고, 결과가 비어 있으면 [`DEFAULT_IDENTIFIER`]로 대체합니다.
pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_IDENTIFIER.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// 식별자의 위험도 페이로드를 현재 시각으로 계산합니다.
///
/// `generated_at`을 제외하면 항상 값을 반환하며 결정적입니다.
pub fn compute_risk(identifier: &str) -> RiskPayload {
    compute_risk_at(identifier, Utc::now())
}

/// 타임스탬프를 명시적으로 받는 [`compute_risk`]
pub fn compute_risk_at(identifier: &str, now: DateTime<Utc>) -> RiskPayload {
    let started = Instant::now();
    let package = normalize_identifier(identifier);
    let profile = detect_profile(&package);
    let demo = is_known_demo(&package);

    let (score, app_name) = if demo {
        (BASE_SCORE, DEMO_APP_NAME.to_owned())
    } else {
        (generated_score(&package), display_name(&package))
    };
    let level = RiskLevel::from_score(score);
    let soften = !demo && level != RiskLevel::Critical;

    let payload = RiskPayload {
        risk_score_text: score_text(score),
        risk_level: level,
        verdict: VERDICT.to_owned(),
        analysis_summary: ANALYSIS_SUMMARY.to_owned(),
        permissions: permissions_for(profile, soften),
        threat_flow: threat_flow(),
        actions: actions_for(profile, score),
        usage_advice: usage_advice(level).to_owned(),
        generated_at: now,
        risk_score: score,
        app_name,
        package,
    };

    counter!(
        m::SCAN_REQUESTS_TOTAL,
        m::LABEL_LEVEL => level.as_label(),
        m::LABEL_PROFILE => profile.to_string()
    )
    .increment(1);
    histogram!(m::SCAN_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

    debug!(
        package = %payload.package,
        profile = %profile,
        score,
        level = %level,
        demo,
        "risk computed"
    );

    payload
}

/// 모든 페이로드에 포함되는 유출 경로
pub fn threat_flow() -> Vec<ThreatFlowNode> {
    [
        ("Device", "📱", FlowNodeKind::Source),
        ("Contacts", "📞", FlowNodeKind::Risk),
        ("SMS", "💬", FlowNodeKind::Risk),
        ("Microphone", "🎙️", FlowNodeKind::Risk),
        ("Unknown Server", "☁️", FlowNodeKind::Sink),
    ]
    .into_iter()
    .map(|(label, icon, kind)| ThreatFlowNode {
        label: label.to_owned(),
        icon: icon.to_owned(),
        kind,
    })
    .collect()
}
