//! Keyword categorization.
//!
//! Ordered substring rules, first match wins. The word lists are product
//! tuning data, not an algorithm — they are kept literal and verbatim.

use crate::model::KeywordCategory;

/// "Near me" phrases. Highest priority: these mark explicit local intent
/// even when a place name is also present.
const NEAR_ME_PHRASES: &[&str] = &["근처", "주변", "가까운", "내주변", "근방"];

/// City/district place names marking regional intent.
const REGION_NAMES: &[&str] = &[
    "서울", "부산", "대구", "인천", "광주", "대전", "울산", "세종", "제주", "경기", "수원",
    "성남", "고양", "용인", "부천", "안산", "안양", "남양주", "화성", "평택", "의정부", "시흥",
    "파주", "김포", "광명", "군포", "강남", "강북", "강동", "강서", "서초", "송파", "마포",
    "종로", "용산", "영등포", "구로", "노원", "은평", "춘천", "청주", "전주", "천안", "포항",
    "창원",
];

/// Review/recommendation vocabulary typical of blog and review content.
const REVIEW_WORDS: &[&str] = &[
    "후기", "리뷰", "추천", "순위", "비교", "가격", "베스트", "인기", "저렴한", "어디가",
    "어떻게", "방법",
];

/// Strings longer than this are assumed to be blog-post titles surfaced
/// inline rather than search keywords.
const LONG_TEXT_CHARS: usize = 15;

/// Map accepted keyword text to a category. Pure, deterministic, priority
/// order: location-based, regional, blog-review, general.
pub fn categorize(text: &str) -> KeywordCategory {
    let trimmed = text.trim();

    if NEAR_ME_PHRASES.iter().any(|p| trimmed.contains(p)) {
        return KeywordCategory::LocationBased;
    }

    if REGION_NAMES.iter().any(|r| trimmed.contains(r)) {
        return KeywordCategory::Regional;
    }

    if REVIEW_WORDS.iter().any(|w| trimmed.contains(w))
        || trimmed.chars().count() > LONG_TEXT_CHARS
    {
        return KeywordCategory::BlogReview;
    }

    KeywordCategory::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_me_beats_region() {
        // Matches both a near-me phrase and a region name; priority order
        // picks location-based.
        assert_eq!(categorize("서울 근처 맛집"), KeywordCategory::LocationBased);
        assert_eq!(categorize("강남역 주변 카페"), KeywordCategory::LocationBased);
    }

    #[test]
    fn test_region_beats_review() {
        assert_eq!(categorize("부산 여행 후기"), KeywordCategory::Regional);
        assert_eq!(categorize("전주 한옥마을"), KeywordCategory::Regional);
    }

    #[test]
    fn test_review_vocabulary() {
        assert_eq!(categorize("노트북 추천"), KeywordCategory::BlogReview);
        assert_eq!(categorize("에어팟 리뷰"), KeywordCategory::BlogReview);
        assert_eq!(categorize("청소기 가격 비교"), KeywordCategory::BlogReview);
    }

    #[test]
    fn test_long_text_is_blog_review() {
        // 16 chars, no review vocabulary.
        let text = "오늘 하루 일상을 기록해 보았다";
        assert!(text.chars().count() > 15);
        assert_eq!(categorize(text), KeywordCategory::BlogReview);
    }

    #[test]
    fn test_default_is_general() {
        assert_eq!(categorize("무선 이어폰"), KeywordCategory::General);
        assert_eq!(categorize("코딩 공부"), KeywordCategory::General);
    }

    #[test]
    fn test_pure_and_deterministic() {
        for _ in 0..3 {
            assert_eq!(categorize("수원 맛집"), KeywordCategory::Regional);
        }
    }
}
