//! Autosuggest collector — the live suggestion list under the home-page
//! search box, read before any search is submitted.

use crate::browser::selector::SelectorChain;
use crate::browser::{BrowserSession, RawElement};
use crate::config::ScraperConfig;
use crate::error::CollectorError;
use crate::jitter::RandomJitter;
use crate::keyword::is_valid_keyword;
use crate::model::{KeywordCategory, KeywordRecord, KeywordType};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

pub const NAVER_HOME: &str = "https://www.naver.com";

/// Candidate search-box inputs on the home page. Shared with the
/// orchestrator, which submits the form this collector typed into.
pub const SEARCH_INPUT_SELECTORS: &[&str] = &[
    "#query",
    "input[name=query]",
    "input#search",
    ".search_input_box input",
    "input[type=search]",
];

/// Candidate suggestion list items. Deliberately broad: this block has the
/// least stable markup of all four features, so the chain carries every
/// shape observed so far plus generic fallbacks.
const SUGGEST_ITEM_SELECTORS: &[&str] = &[
    ".atcmp_wrap li.atcmp_item",
    ".atcmp_wrap li",
    "ul.kwd_lst li",
    ".sch_atcmp li",
    "#atcmp_layer li",
    ".autocomplete_wrap li",
    ".keyword_area li",
    "[class*=atcmp] li",
    "[class*=autocomplete] li",
    "[class*=suggest] li",
    "ul[role=listbox] li",
    ".search_layer li",
    "form[name=search] li",
];

/// Reads the suggestion dropdown that renders while typing the query.
pub struct AutosuggestCollector {
    jitter: RandomJitter,
    settle: Duration,
}

impl AutosuggestCollector {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            jitter: RandomJitter::from_config(config),
            settle: Duration::from_millis(config.suggest_settle_ms),
        }
    }
}

#[async_trait]
impl super::Collector for AutosuggestCollector {
    fn keyword_type(&self) -> KeywordType {
        KeywordType::Autosuggest
    }

    async fn collect(
        &self,
        session: &BrowserSession,
        query: &str,
    ) -> Result<Vec<KeywordRecord>, CollectorError> {
        session.goto(NAVER_HOME).await?;
        self.jitter.pause().await;

        let typed = session.type_into(SEARCH_INPUT_SELECTORS, query).await?;
        if !typed {
            return Err(CollectorError::Extraction(
                "home-page search input not found".to_string(),
            ));
        }

        // The dropdown exposes no pollable completion signal; a bounded
        // fixed settle is the only wait available here.
        tokio::time::sleep(self.settle).await;

        let chain = SelectorChain::new(SUGGEST_ITEM_SELECTORS.iter().copied());
        let resolution = chain
            .resolve(session, |text| is_valid_keyword(text, query))
            .await?;

        match resolution {
            Some(res) => {
                info!(
                    count = res.elements.len(),
                    selector = %res.selector,
                    "autosuggest items collected"
                );
                Ok(build_records(query, res.elements))
            }
            None => {
                info!("no autosuggest items rendered");
                Ok(Vec::new())
            }
        }
    }
}

/// Autosuggest records bypass the classifier: every item carries the fixed
/// autosuggest category tag. Rank follows accepted order, 1-based.
pub fn build_records(query: &str, accepted: Vec<RawElement>) -> Vec<KeywordRecord> {
    accepted
        .into_iter()
        .enumerate()
        .map(|(i, el)| {
            KeywordRecord::new(
                query,
                KeywordType::Autosuggest,
                KeywordCategory::Autosuggest,
                &el.text,
                i as u32 + 1,
            )
            .with_href(el.href)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_records_assigns_contiguous_ranks() {
        let accepted: Vec<RawElement> = (1..=8)
            .map(|i| RawElement {
                text: format!("맛집 후보 {i}"),
                href: None,
                image_alt: None,
                visible: true,
            })
            .collect();

        let records = build_records("맛집", accepted);
        assert_eq!(records.len(), 8);
        for (i, rec) in records.iter().enumerate() {
            assert_eq!(rec.rank, i as u32 + 1);
            assert_eq!(rec.keyword_type, KeywordType::Autosuggest);
            assert_eq!(rec.category, KeywordCategory::Autosuggest);
        }
    }

    #[test]
    fn test_build_records_empty_input() {
        assert!(build_records("맛집", Vec::new()).is_empty());
    }
}
