//! 결정적 점수 산출
//!
//! 점수는 식별자의 순수 함수입니다: 유니코드 스칼라 값의 합으로
//! [`StdRng`]를 시드하고, 뽑은 오프셋 하나를 기본 점수에
//! 더합니다.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 오프셋 적용 전 모든 식별자의 시작 점수
pub const BASE_SCORE: u8 = 82;
/// 도달 가능한 최저 점수
pub const MIN_SCORE: u8 = 15;
/// 도달 가능한 최고 점수
pub const MAX_SCORE: u8 = 98;

const MIN_OFFSET: i16 = -25;
const MAX_OFFSET: i16 = 15;

/// 항상 고정 기본 페이로드를 내는 데모 식별자
pub const KNOWN_DEMO_IDENTIFIERS: [&str; 3] = [
    "com.example.calculatorplus",
    "com.example.calculator",
    "com.example.calculatorpro",
];

/// [`KNOWN_DEMO_IDENTIFIERS`]에 대소문자 구분 없이 포함되는지 여부
pub fn is_known_demo(identifier: &str) -> bool {
    KNOWN_DEMO_IDENTIFIERS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(identifier))
}

/// 식별자의 유니코드 스칼라 값 합계
pub fn seed_for(identifier: &str) -> u64 {
    identifier.chars().map(|c| u64::from(u32::from(c))).sum()
}

/// 데모가 아닌 식별자의 `[MIN_SCORE, MAX_SCORE]` 범위 점수
pub fn generated_score(identifier: &str) -> u8 {
    let mut rng = StdRng::seed_from_u64(seed_for(identifier));
    let offset: i16 = rng.random_range(MIN_OFFSET..=MAX_OFFSET);
    let score = (i16::from(BASE_SCORE) + offset).clamp(i16::from(MIN_SCORE), i16::from(MAX_SCORE));
    // 위에서 u8 범위로 clamp됨
    u8::try_from(score).unwrap_or(MIN_SCORE)
}

/// `"Privacy Risk 8.2 / 10"`
pub fn score_text(score: u8) -> String {
    format!("Privacy Risk {:.1} / 10", f64::from(score) / 10.0)
}
