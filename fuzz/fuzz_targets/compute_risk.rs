#![no_main]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

use apkwatch_core::event::StreamEvent;
use apkwatch_core::types::RiskLevel;
use apkwatch_risk_engine::compute_risk_at;

fuzz_target!(|identifier: &str| {
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let payload = compute_risk_at(identifier, now);

    assert!((15..=98).contains(&payload.risk_score));
    assert_eq!(payload.risk_level, RiskLevel::from_score(payload.risk_score));
    assert!(!payload.package.is_empty());
    assert_eq!(payload.package, payload.package.trim());
    assert!(!payload.actions.is_empty());
    assert_eq!(payload.threat_flow.len(), 5);

    // total and deterministic
    assert_eq!(payload, compute_risk_at(identifier, now));

    // scan events always encode to single-line JSON tagged "scan"
    let json = StreamEvent::scan(Arc::new(payload)).to_json().unwrap();
    assert!(!json.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "scan");
});
