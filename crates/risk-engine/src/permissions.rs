//! 프로필별 권한 템플릿
//!
//! 템플릿은 호출마다 새로 만들어지므로 한 요청의 조정이
//! 다음 요청으로 새어 나가지 않습니다.

use apkwatch_core::types::{PermissionFinding, PermissionReport, Profile};

const PERMISSION_PREFIX: &str = "android.permission.";

const DANGEROUS_TEMPLATE: [(&str, &str); 4] = [
    (
        "READ_CONTACTS",
        "Reads the full address book and may expose personal relationships.",
    ),
    (
        "SEND_SMS",
        "Can silently send SMS, including premium-rate messages.",
    ),
    (
        "RECORD_AUDIO",
        "Microphone access enables ambient audio capture.",
    ),
    (
        "ACCESS_FINE_LOCATION",
        "Tracks precise GPS position, enabling movement profiling.",
    ),
];

const NORMAL_TEMPLATE: [(&str, &str); 3] = [
    (
        "INTERNET",
        "Network connectivity for API calls and content delivery.",
    ),
    (
        "WAKE_LOCK",
        "Prevents the device from sleeping during active use.",
    ),
    ("VIBRATE", "Haptic feedback for UI interactions."),
];

/// 시스템 개인화 도구에 기대되는 오버레이 권한
const SYSTEM_OVERLAY: (&str, &str) = (
    "SYSTEM_ALERT_WINDOW",
    "Draw over other apps to provide UI modules or overlays.",
);

/// 시스템 개인화 도구에서는 dangerous 목록에서 제외
const SYSTEM_EXEMPT: &str = "READ_CONTACTS";

/// 결과가 critical이 아닐 때 dangerous 사유에서 제거하는 문구
const ALARMING_WORD: &str = "silently ";

fn finding((short_name, reason): (&str, &str)) -> PermissionFinding {
    PermissionFinding {
        name: format!("{PERMISSION_PREFIX}{short_name}"),
        reason: reason.to_owned(),
    }
}

/// 프로필에 대한 권한 보고서를 만듭니다.
///
/// `soften`이 설정되면 dangerous 사유에서 과장된 표현을 제거합니다.
pub fn permissions_for(profile: Profile, soften: bool) -> PermissionReport {
    let system = profile == Profile::SystemPersonalization;

    let dangerous = DANGEROUS_TEMPLATE
        .into_iter()
        .filter(|(name, _)| !(system && *name == SYSTEM_EXEMPT))
        .map(finding)
        .map(|mut f| {
            if soften {
                f.reason = f.reason.replace(ALARMING_WORD, "");
            }
            f
        })
        .collect();

    let mut normal: Vec<PermissionFinding> = NORMAL_TEMPLATE.into_iter().map(finding).collect();
    if system {
        normal.push(finding(SYSTEM_OVERLAY));
    }

    PermissionReport { dangerous, normal }
}
