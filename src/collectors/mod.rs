//! Per-feature keyword collectors.
//!
//! Each collector extracts one category of keyword data from a loaded page
//! and is individually fault-isolated: it returns a typed error instead of
//! aborting, and the orchestrator maps that error to an empty result. The
//! "isolate, don't propagate" policy lives in the signature, not in a
//! blanket catch.

pub mod autosuggest;
pub mod hot_topics;
pub mod related;
pub mod together;

pub use autosuggest::AutosuggestCollector;
pub use hot_topics::HotTopicsCollector;
pub use related::RelatedKeywordsCollector;
pub use together::TogetherSearchedCollector;

use crate::browser::{BrowserSession, RawElement};
use crate::error::CollectorError;
use crate::keyword::categorize;
use crate::model::{KeywordRecord, KeywordType};
use async_trait::async_trait;

/// One collector: `collect` never panics the run; any internal failure
/// surfaces as `Err` for the orchestrator to trap.
#[async_trait]
pub trait Collector: Send + Sync {
    fn keyword_type(&self) -> KeywordType;

    async fn collect(
        &self,
        session: &BrowserSession,
        query: &str,
    ) -> Result<Vec<KeywordRecord>, CollectorError>;
}

/// Build records from a results-page link block, keeping only geo-intent
/// categories (location-based and regional).
///
/// This filter is deliberate, inherited product behavior: general and
/// blog-review candidates are discovered and validated but discarded, and
/// `rank` runs dense over the *kept* records only, not over DOM order.
pub fn geo_link_records(
    query: &str,
    kind: KeywordType,
    accepted: Vec<RawElement>,
) -> Vec<KeywordRecord> {
    let mut records = Vec::new();
    for el in accepted {
        let category = categorize(&el.text);
        if !category.is_geo() {
            continue;
        }
        let rank = records.len() as u32 + 1;
        records.push(
            KeywordRecord::new(query, kind, category, &el.text, rank)
                .with_href(el.href)
                .with_image_alt(el.image_alt),
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(text: &str) -> RawElement {
        RawElement {
            text: text.to_string(),
            href: Some(format!("/search?query={text}")),
            image_alt: None,
            visible: true,
        }
    }

    #[test]
    fn test_geo_filter_drops_general_and_blog_review() {
        // 2 regional, 1 location-based, 1 review, 1 general.
        let accepted = vec![
            el("서울 맛집"),
            el("근처 맛집"),
            el("맛집 후기 모음"),
            el("부산 횟집"),
            el("저녁 메뉴"),
        ];
        let records = geo_link_records("맛집", KeywordType::TogetherSearched, accepted);
        assert_eq!(records.len(), 3);
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["서울 맛집", "근처 맛집", "부산 횟집"]);
    }

    #[test]
    fn test_rank_is_dense_over_kept_records_only() {
        let accepted = vec![
            el("아무 키워드"),  // general, dropped
            el("서울 카페"),    // kept, rank 1
            el("카페 추천 리스트"), // review, dropped
            el("주변 카페"),    // kept, rank 2
        ];
        let records = geo_link_records("카페", KeywordType::HotTopics, accepted);
        let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }
}
