//! Trending-topics collector — the same DOM shape as the
//! "people also search" block, under different section markers.
//!
//! Read-only over the loaded results page, like the together collector.

use crate::browser::selector::SelectorChain;
use crate::browser::BrowserSession;
use crate::config::ScraperConfig;
use crate::error::CollectorError;
use crate::keyword::is_valid_keyword;
use crate::model::{KeywordRecord, KeywordType};
use async_trait::async_trait;
use tracing::info;

/// Section markers for the trending-topics block.
const SECTION_SELECTORS: &[&str] = &[
    "div.api_subject_bx.hot_topic",
    ".sc_new.sp_trend",
    "section[class*=trend]",
    "div[class*=hot_topic]",
    ".lst_issue_keyword",
    "div.keyword_rank",
];

pub struct HotTopicsCollector;

impl HotTopicsCollector {
    pub fn new(_config: &ScraperConfig) -> Self {
        Self
    }
}

#[async_trait]
impl super::Collector for HotTopicsCollector {
    fn keyword_type(&self) -> KeywordType {
        KeywordType::HotTopics
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
            info!("no trending-topics block found");
            return Ok(Vec::new());
        };

        let records = super::geo_link_records(query, KeywordType::HotTopics, res.elements);
        info!(
            count = records.len(),
            selector = %res.selector,
            "trending-topic keywords collected"
        );
        Ok(records)
    }
}
