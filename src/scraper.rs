//! Orchestrator — one forward pass over the four collectors.
//!
//! Owns the browser session for the whole run; collectors only borrow it.
//! Phase order respects page-state dependencies: autosuggest runs on the
//! home page, the two read-only results-page collectors interleave on the
//! shared page, and the pagination-mutating related collector goes last.
//! The session is torn down on every exit path, and callers always receive
//! a structured envelope, never a raw error.

use crate::browser::BrowserSession;
use crate::collectors::{
    autosuggest::SEARCH_INPUT_SELECTORS, AutosuggestCollector, Collector, HotTopicsCollector,
    RelatedKeywordsCollector, TogetherSearchedCollector,
};
use crate::config::ScraperConfig;
use crate::error::{CollectorError, ScrapeError};
use crate::jitter::RandomJitter;
use crate::model::{KeywordRecord, KeywordType, ScrapeOutcome};
use crate::processor::DataProcessor;
use chrono::Utc;
use std::time::Instant;
use tracing::{info, warn};
use url::Url;

pub const SEARCH_BASE: &str = "https://search.naver.com/search.naver";

/// Results-page landmarks used to confirm the search landed.
const RESULTS_LANDMARKS: &str = "#main_pack, .main_pack, #content";

/// Build the direct results URL for a query.
pub fn search_url(query: &str) -> String {
    // SEARCH_BASE is a valid absolute URL, so parsing cannot fail.
    Url::parse_with_params(SEARCH_BASE, &[("query", query)])
        .map(String::from)
        .unwrap_or_else(|_| format!("{SEARCH_BASE}?query={query}"))
}

/// Map a collector result to records, trapping failures at this boundary:
/// a failing collector yields an empty list and a diagnostic, never an
/// aborted run.
pub fn isolate(
    kind: KeywordType,
    result: Result<Vec<KeywordRecord>, CollectorError>,
) -> Vec<KeywordRecord> {
    match result {
        Ok(records) => {
            info!(
                collector = kind.as_str(),
                count = records.len(),
                "collector finished"
            );
            records
        }
        Err(e) => {
            warn!(
                collector = kind.as_str(),
                error = %e,
                "collector failed, continuing with empty result"
            );
            Vec::new()
        }
    }
}

pub struct NaverKeywordScraper {
    config: ScraperConfig,
}

impl NaverKeywordScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Run the full pipeline for one query.
    pub async fn scrape(&self, query: &str) -> ScrapeOutcome {
        let started_at = Utc::now();
        let start = Instant::now();
        info!(query, "scrape starting");

        let session = match BrowserSession::launch(&self.config).await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "browser launch failed");
                return ScrapeOutcome::failure(e);
            }
        };

        let collected = self.run_collectors(&session, query).await;

        // Teardown happens before any envelope is built, success or not.
        session.close().await;

        let records = match collected {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "scrape aborted");
                return ScrapeOutcome::failure(e);
            }
        };

        let processor = DataProcessor::new(&self.config.output_dir);
        let records = processor.clean(records);
        let duration = start.elapsed().as_secs_f64();

        let mut stats = processor.generate_stats(query, started_at, duration, records.clone());
        stats.quality_issues = self
            .config
            .quality
            .evaluate(&stats.counts_by_type, duration);
        for issue in &stats.quality_issues {
            warn!(%issue, "quality threshold violated");
        }

        let filepath = match processor.save_to_file(&records, query) {
            Ok(path) => path,
            Err(e) => {
                // The file is the durable record of truth; losing it fails
                // the run even though collection succeeded.
                warn!(error = %e, "result file write failed");
                return ScrapeOutcome::failure(e);
            }
        };

        info!(
            query,
            total = records.len(),
            duration_secs = format!("{duration:.1}"),
            issues = stats.quality_issues.len(),
            "scrape finished"
        );

        ScrapeOutcome {
            success: true,
            data: records,
            filepath: Some(filepath),
            stats: Some(stats),
            error: None,
        }
    }

    async fn run_collectors(
        &self,
        session: &BrowserSession,
        query: &str,
    ) -> Result<Vec<KeywordRecord>, ScrapeError> {
        let mut all = Vec::new();

        // Phase 1: home page, before any search is submitted.
        let autosuggest = AutosuggestCollector::new(&self.config);
        all.extend(isolate(
            KeywordType::Autosuggest,
            autosuggest.collect(session, query).await,
        ));

        // Phase 2: reach the results page. This transition is required;
        // failure here is fatal.
        self.open_results_page(session, query).await?;

        // Phase 3: two read-only passes interleaved over the shared page.
        // Neither navigates nor clicks; a future collector that does must
        // move out of this join and into its own phase.
        let together = TogetherSearchedCollector::new(&self.config);
        let hot_topics = HotTopicsCollector::new(&self.config);
        let (together_result, hot_result) = tokio::join!(
            together.collect(session, query),
            hot_topics.collect(session, query),
        );
        all.extend(isolate(KeywordType::TogetherSearched, together_result));
        all.extend(isolate(KeywordType::HotTopics, hot_result));

        // Phase 4: pagination mutates page state, so this runs strictly
        // after the joint pass.
        let related = RelatedKeywordsCollector::new(&self.config);
        all.extend(isolate(
            KeywordType::RelatedKeywords,
            related.collect(session, query).await,
        ));

        Ok(all)
    }

    /// Submit the query typed during the autosuggest phase; when the form
    /// submit does not land on the results page (or the box was never
    /// typed into), navigate to the results URL directly.
    async fn open_results_page(
        &self,
        session: &BrowserSession,
        query: &str,
    ) -> Result<(), ScrapeError> {
        let jitter = RandomJitter::from_config(&self.config);
        jitter.pause().await;

        let submitted = session
            .submit_form_of(SEARCH_INPUT_SELECTORS)
            .await
            .unwrap_or(false);
        if submitted {
            session.settle_navigation().await;
        }

        let on_results = session
            .current_url()
            .await
            .map(|u| u.contains("search.naver"))
            .unwrap_or(false);
        if !on_results {
            info!("form submit did not reach results, navigating directly");
            session.goto(&search_url(query)).await?;
        }

        if !session
            .wait_for_selector(RESULTS_LANDMARKS, self.config.wait_timeout_ms)
            .await?
        {
            warn!("results landmarks never appeared, collectors may come up empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeywordCategory;

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url("맛집 추천");
        assert!(url.starts_with("https://search.naver.com/search.naver?query="));
        assert!(!url.contains(' '));
        let parsed = Url::parse(&url).unwrap();
        let (_, v) = parsed.query_pairs().next().unwrap();
        assert_eq!(v, "맛집 추천");
    }

    #[test]
    fn test_isolate_maps_error_to_empty() {
        let failed: Result<Vec<KeywordRecord>, CollectorError> =
            Err(CollectorError::Extraction("boom".to_string()));
        assert!(isolate(KeywordType::HotTopics, failed).is_empty());
    }

    #[test]
    fn test_isolate_passes_records_through() {
        let records = vec![KeywordRecord::new(
            "맛집",
            KeywordType::Autosuggest,
            KeywordCategory::Autosuggest,
            "서울 맛집",
            1,
        )];
        let out = isolate(KeywordType::Autosuggest, Ok(records));
        assert_eq!(out.len(), 1);
    }
}
