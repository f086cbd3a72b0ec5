//! 점으로 구분된 식별자에서 표시 이름 도출
//!
//! `com.acme.photo_editor.android`는 `Photo Editor`가 됩니다: 제품 의미가
//! 없는 뒤쪽 토큰(`android`, `app`, ...)은 건너뜁니다.

/// 쓸 만한 토큰이 없을 때 반환하는 이름
pub const UNKNOWN_APP_NAME: &str = "Unknown App";

/// 단독으로는 제품명이 될 수 없는 토큰
const GENERIC_TOKENS: [&str; 7] = [
    "android", "app", "mobile", "apps", "client", "official", "beta",
];

/// 식별자에서 사람이 읽을 수 있는 이름을 도출합니다.
pub fn display_name(identifier: &str) -> String {
    let tokens: Vec<&str> = identifier.split('.').filter(|t| !t.is_empty()).collect();

    let Some(last) = tokens.last() else {
        return UNKNOWN_APP_NAME.to_owned();
    };

    for token in tokens.iter().rev() {
        let clean = token.replace('_', " ");
        let clean = clean.trim();
        if !GENERIC_TOKENS.contains(&clean.to_lowercase().as_str()) {
            return title_case(&clean.replace('-', " "));
        }
    }

    title_case(&last.replace(['_', '-'], " "))
}

/// 문자가 아닌 것 뒤의 글자는 대문자로, 나머지는 소문자로 바꿉니다.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_letter = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}
