//! Keyword candidate validation.
//!
//! Pure predicate over raw extracted text. Rejects UI chrome, degenerate
//! lengths, echoes of the original query, and strings with no meaningful
//! character. Referentially transparent — the unit to property-test.

/// Site-chrome substrings that mark a scraped string as UI furniture rather
/// than a keyword: pagination labels, ad markers, account/navigation text.
const UI_CHROME_DENYLIST: &[&str] = &[
    "더보기",
    "광고",
    "페이지",
    "이전",
    "다음",
    "네이버",
    "도움말",
    "신고",
    "자세히",
    "바로가기",
    "로그인",
    "회원가입",
    "전체보기",
    "펼치기",
    "접기",
    "설정",
    "서비스",
    "검색어제안",
    "도움말보기",
];

/// Minimum and maximum accepted keyword length, in characters.
const MIN_CHARS: usize = 2;
const MAX_CHARS: usize = 30;

/// Decide whether `text` is an acceptable keyword candidate for
/// `original_query`.
pub fn is_valid_keyword(text: &str, original_query: &str) -> bool {
    let trimmed = text.trim();

    let len = trimmed.chars().count();
    if !(MIN_CHARS..=MAX_CHARS).contains(&len) {
        return false;
    }

    if UI_CHROME_DENYLIST.iter().any(|w| trimmed.contains(w)) {
        return false;
    }

    if trimmed == original_query.trim() {
        return false;
    }

    if !trimmed.chars().any(is_meaningful_char) {
        return false;
    }

    true
}

/// A character that can carry keyword meaning: alphanumeric in any script,
/// or Hangul jamo (composed syllables are already alphanumeric).
fn is_meaningful_char(c: char) -> bool {
    c.is_alphanumeric() || is_hangul_jamo(c)
}

fn is_hangul_jamo(c: char) -> bool {
    matches!(c, '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_korean_keyword() {
        assert!(is_valid_keyword("서울 맛집", "맛집"));
        assert!(is_valid_keyword("카페 창업 비용", "카페"));
    }

    #[test]
    fn test_rejects_length_out_of_bounds() {
        assert!(!is_valid_keyword("가", "맛집"));
        assert!(!is_valid_keyword("", "맛집"));
        assert!(!is_valid_keyword("   ", "맛집"));
        let long: String = "가".repeat(31);
        assert!(!is_valid_keyword(&long, "맛집"));
        // Exactly at the bounds is accepted.
        assert!(is_valid_keyword("가나", "맛집"));
        let max: String = "나".repeat(30);
        assert!(is_valid_keyword(&max, "맛집"));
    }

    #[test]
    fn test_length_is_measured_in_chars_not_bytes() {
        // 12 Hangul syllables: 36 bytes, 12 chars — must be accepted.
        let text = "가나다라마바사아자차카타";
        assert!(is_valid_keyword(text, "맛집"));
    }

    #[test]
    fn test_rejects_ui_chrome() {
        assert!(!is_valid_keyword("더보기", "맛집"));
        assert!(!is_valid_keyword("검색 결과 더보기", "맛집"));
        assert!(!is_valid_keyword("광고 안내", "맛집"));
        assert!(!is_valid_keyword("다음 페이지", "맛집"));
        assert!(!is_valid_keyword("네이버 로그인", "맛집"));
    }

    #[test]
    fn test_rejects_echo_of_query() {
        assert!(!is_valid_keyword("맛집", "맛집"));
        assert!(!is_valid_keyword("  맛집  ", "맛집"));
        // Superstrings of the query are fine.
        assert!(is_valid_keyword("맛집 추천", "맛집"));
    }

    #[test]
    fn test_rejects_symbol_only_text() {
        assert!(!is_valid_keyword("··", "맛집"));
        assert!(!is_valid_keyword(">>", "맛집"));
        assert!(!is_valid_keyword("- -", "맛집"));
    }

    #[test]
    fn test_accepts_mixed_scripts_and_digits() {
        assert!(is_valid_keyword("iphone 15", "아이폰"));
        assert!(is_valid_keyword("2호선 맛집", "맛집"));
    }
}
