//! "People also search" collector — a link block on the results page.
//!
//! Runs as a read-only pass over the already-loaded results page: no
//! navigation, no clicks, so it can safely interleave with the hot-topics
//! collector on the same page.

use crate::browser::selector::SelectorChain;
use crate::browser::BrowserSession;
use crate::config::ScraperConfig;
use crate::error::CollectorError;
use crate::keyword::is_valid_keyword;
use crate::model::{KeywordRecord, KeywordType};
use async_trait::async_trait;
use tracing::info;

/// Section markers for the "people also search" block, most recently
/// observed shapes first.
const SECTION_SELECTORS: &[&str] = &[
    "div.api_subject_bx.together_search",
    ".sc_new.sp_nkeyword",
    "section[class*=together]",
    "div[class*=also_search]",
    ".lst_related_srch",
    "div.keyword_challenge",
];

pub struct TogetherSearchedCollector;

impl TogetherSearchedCollector {
    pub fn new(_config: &ScraperConfig) -> Self {
        Self
    }
}

#[async_trait]
impl super::Collector for TogetherSearchedCollector {
    fn keyword_type(&self) -> KeywordType {
        KeywordType::TogetherSearched
    }

    async fn collect(
        &self,
        session: &BrowserSession,
        query: &str,
    ) -> Result<Vec<KeywordRecord>, CollectorError> {
        let candidates: Vec<String> = SECTION_SELECTORS.iter().map(|s| format!("{s} a")).collect();
        let chain = SelectorChain::new(candidates);
        let resolution = chain
            .resolve(session, |text| is_valid_keyword(text, query))
            .await?;

        let Some(res) = resolution else {
            info!("no people-also-search block found");
            return Ok(Vec::new());
        };

        let records = super::geo_link_records(query, KeywordType::TogetherSearched, res.elements);
        info!(
            count = records.len(),
            selector = %res.selector,
            "people-also-search keywords collected"
        );
        Ok(records)
    }
}
