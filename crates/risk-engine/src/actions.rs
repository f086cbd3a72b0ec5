//! 대응 방안 및 사용 권고

use apkwatch_core::types::{Profile, RiskLevel};

/// 모든 critical/elevated 목록에 포함되는 공통 단계
pub const REVOKE_PERMISSIONS: &str = "Open Settings → Apps → Permissions and revoke Contacts, SMS, Microphone, and Location as applicable.";

/// 프로필과 점수에 해당하는 순서 있는 대응 방안 목록
pub fn actions_for(profile: Profile, score: u8) -> Vec<String> {
    let level = RiskLevel::from_score(score);
    let steps: &[&str] = match (profile, level) {
        (Profile::Finance, RiskLevel::Critical) => &[
            "Uninstall immediately and install only banking apps from your bank’s verified publisher.",
            REVOKE_PERMISSIONS,
            "Change online banking and email passwords, and enable 2FA.",
            "Check recent transactions and contact your bank’s fraud team if anything looks off.",
        ],
        (Profile::Finance, RiskLevel::Elevated) => &[
            REVOKE_PERMISSIONS,
            "Disable overlay/draw-over permissions; they can capture sensitive input.",
            "Monitor transactions and app updates for unusual behavior.",
        ],
        (Profile::Finance, RiskLevel::Guarded) => {
            &["Keep the app updated and review permission requests after each update."]
        }

        (Profile::Messaging, RiskLevel::Critical) => &[
            "Uninstall the app; it can send/read SMS without notice.",
            REVOKE_PERMISSIONS,
            "Inspect carrier bill for premium SMS charges.",
        ],
        (Profile::Messaging, RiskLevel::Elevated) => &[
            REVOKE_PERMISSIONS,
            "Disable default SMS handler role unless required.",
        ],
        (Profile::Messaging, RiskLevel::Guarded) => {
            &["Limit SMS/MMS access to core features only."]
        }

        (Profile::Media, RiskLevel::Critical) => &[
            "Uninstall or deny Microphone/Camera access whenever not in active use.",
            REVOKE_PERMISSIONS,
            "Clear cached media and review connected cloud accounts.",
        ],
        (Profile::Media, RiskLevel::Elevated) => &[
            REVOKE_PERMISSIONS,
            "Restrict background activity and disable auto-upload to unknown clouds.",
        ],
        (Profile::Media, RiskLevel::Guarded) => {
            &["Verify media permissions are requested only during capture or editing."]
        }

        (Profile::SystemPersonalization, RiskLevel::Critical) => &[
            "Uninstall modules from untrusted sources.",
            REVOKE_PERMISSIONS,
            "Revoke Draw-over-other-apps for modules that don’t need overlays.",
        ],
        (Profile::SystemPersonalization, RiskLevel::Elevated) => &[
            "Audit modules within the suite and remove those requesting sensitive data.",
            REVOKE_PERMISSIONS,
        ],
        (Profile::SystemPersonalization, RiskLevel::Guarded) => {
            &["Keep modules updated; review overlays and accessibility access regularly."]
        }

        (Profile::Generic, RiskLevel::Critical) => &[
            "Uninstall the application and replace it with a trusted alternative.",
            REVOKE_PERMISSIONS,
            "Scan device with Play Protect and a reputable mobile AV.",
        ],
        (Profile::Generic, RiskLevel::Elevated) => &[
            REVOKE_PERMISSIONS,
            "Limit background data and remove unused permissions.",
        ],
        (Profile::Generic, RiskLevel::Guarded) => {
            &["Review permission prompts carefully; deny non-essential access."]
        }
    };
    steps.iter().map(|s| (*s).to_owned()).collect()
}

/// 심각도 구간별 한 문장 권고
pub fn usage_advice(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Guarded => {
            "You can use this application. It appears safe based on requested permissions."
        }
        RiskLevel::Elevated => {
            "Use with caution. Review and trim permissions; keep the app updated."
        }
        RiskLevel::Critical => {
            "This application is not safe to use. Consider uninstalling and using a trusted alternative."
        }
    }
}
