//! 키워드 기반 프로필 분류

use apkwatch_core::types::Profile;

/// 키워드 테이블 (순서대로 검사). 키워드가 처음 일치한 프로필이
/// 선택됩니다.
const PROFILE_KEYWORDS: [(Profile, &[&str]); 4] = [
    (Profile::Media, &["camera", "photo", "video"]),
    (Profile::Messaging, &["chat", "message", "sms"]),
    (Profile::Finance, &["bank", "pay", "wallet", "finance"]),
    (
        Profile::SystemPersonalization,
        &[
            "goodlock",
            "good_lock",
            "samsung",
            "android.systemui",
            "launcher",
            "theme",
        ],
    ),
];

/// 대소문자 구분 없는 부분 문자열 일치로 식별자를 분류합니다.
///
/// 일치하는 키워드가 없으면 [`Profile::Generic`]을 반환합니다.
pub fn detect_profile(identifier: &str) -> Profile {
    let lowered = identifier.to_lowercase();
    PROFILE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(profile, _)| *profile)
        .unwrap_or(Profile::Generic)
}
