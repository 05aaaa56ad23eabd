//! Related-keywords collector — the paginated related-searches footer.
//!
//! The only collector that mutates page state: it moves to page 2 of the
//! results (UI click, falling back to a direct URL rewrite), then hunts for
//! the related-searches section, scrolling once to trigger lazy rendering
//! before falling back to text-based section matching. When the section is
//! never found, the trailing DOM is logged for selector maintenance and an
//! empty result is returned.

use crate::browser::selector::{accept_candidates, SelectorChain};
use crate::browser::{diagnostics, BrowserSession, RawElement};
use crate::config::ScraperConfig;
use crate::error::CollectorError;
use crate::jitter::RandomJitter;
use crate::keyword::{categorize, is_valid_keyword};
use crate::model::{KeywordRecord, KeywordType};
use async_trait::async_trait;
use tracing::{info, warn};
use url::Url;

/// Pagination widgets the "2" control may live in.
const PAGINATION_CONTAINERS: &[&str] = &[
    ".sc_page",
    ".api_sc_page_wrap",
    "div.paging",
    "div.pgn",
];

/// Related-searches section markers, most specific first.
const SECTION_SELECTORS: &[&str] = &[
    ".related_srch",
    "ul.lst_related_srch",
    "div.api_subject_bx.related",
    "section[class*=related]",
    ".sp_related",
    "div[class*=relate]",
    "footer .relate_srch",
];

/// Heading vocabulary for the loosest fallback: sections are matched by
/// their visible label instead of markup.
const SECTION_HEADING_WORDS: &[&str] = &["연관검색어", "관련검색어", "연관", "관련", "검색어"];

/// How many trailing block elements to log when the section is missing.
const DOM_TAIL_ELEMENTS: usize = 10;

pub struct RelatedKeywordsCollector {
    jitter: RandomJitter,
    max_pages: u32,
}

impl RelatedKeywordsCollector {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            jitter: RandomJitter::from_config(config),
            max_pages: config.max_pages,
        }
    }

    /// Move to page 2: prefer the pagination control, fall back to
    /// rewriting the current URL's paging parameters.
    async fn goto_page_two(&self, session: &BrowserSession) -> Result<(), CollectorError> {
        if session.click_text_in(PAGINATION_CONTAINERS, "2").await? {
            info!("page 2 reached via pagination control");
            session.settle_navigation().await;
            return Ok(());
        }

        let current = session.current_url().await?;
        match page_two_url(&current) {
            Some(next) => {
                info!(url = %next, "page 2 control absent, using url fallback");
                session.goto(&next).await?;
            }
            None => {
                warn!(url = %current, "cannot derive page 2 url, staying on page 1");
            }
        }
        Ok(())
    }

    /// Locate the related-searches links: marker selectors first, then one
    /// full scroll to force lazy rendering and a retry, then the heading
    /// vocabulary fallback.
    async fn find_section_links(
        &self,
        session: &BrowserSession,
        query: &str,
    ) -> Result<Option<Vec<RawElement>>, CollectorError> {
        let candidates: Vec<String> = SECTION_SELECTORS.iter().map(|s| format!("{s} a")).collect();
        let chain = SelectorChain::new(candidates);
        let validate = |text: &str| is_valid_keyword(text, query);

        if let Some(res) = chain.resolve(session, validate).await? {
            return Ok(Some(res.elements));
        }

        info!("related section not visible, scrolling for lazy content");
        session.scroll_to_bottom().await?;
        self.jitter.pause().await;

        if let Some(res) = chain.resolve(session, validate).await? {
            return Ok(Some(res.elements));
        }

        let raw = session
            .extract_links_near_heading(SECTION_HEADING_WORDS)
            .await?;
        let kept = accept_candidates(raw, &validate);
        if !kept.is_empty() {
            info!(count = kept.len(), "related section matched by heading text");
            return Ok(Some(kept));
        }

        Ok(None)
    }
}

#[async_trait]
impl super::Collector for RelatedKeywordsCollector {
    fn keyword_type(&self) -> KeywordType {
        KeywordType::RelatedKeywords
    }

    async fn collect(
        &self,
        session: &BrowserSession,
        query: &str,
    ) -> Result<Vec<KeywordRecord>, CollectorError> {
        if self.max_pages >= 2 {
            self.goto_page_two(session).await?;
        } else {
            info!("page limit keeps related collection on page 1");
        }
        self.jitter.pause().await;

        match self.find_section_links(session, query).await? {
            Some(elements) => {
                let records = build_records(query, elements);
                info!(count = records.len(), "related keywords collected");
                Ok(records)
            }
            None => {
                // Operator-facing aid: dump the trailing structure so the
                // renamed section can be identified and a selector added.
                info!("related section not found, logging trailing dom");
                match session.page_html().await {
                    Ok(html) => diagnostics::log_dom_tail(&html, DOM_TAIL_ELEMENTS),
                    Err(e) => warn!(error = %e, "could not capture page html"),
                }
                Ok(Vec::new())
            }
        }
    }
}

/// Rewrite a results URL to its second page. Drops any existing paging
/// parameters and sets `page=2` with the matching `start` offset.
pub fn page_two_url(current: &str) -> Option<String> {
    let mut url = Url::parse(current).ok()?;
    if !url.has_host() {
        return None;
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "page" && k != "start")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("page", "2");
        pairs.append_pair("start", "11");
    }
    Some(url.to_string())
}

/// Related keywords keep every category; rank follows accepted order.
pub fn build_records(query: &str, accepted: Vec<RawElement>) -> Vec<KeywordRecord> {
    accepted
        .into_iter()
        .enumerate()
        .map(|(i, el)| {
            KeywordRecord::new(
                query,
                KeywordType::RelatedKeywords,
                categorize(&el.text),
                &el.text,
                i as u32 + 1,
            )
            .with_href(el.href)
            .with_image_alt(el.image_alt)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeywordCategory;

    #[test]
    fn test_page_two_url_preserves_query_and_sets_paging() {
        let next =
            page_two_url("https://search.naver.com/search.naver?query=%EB%A7%9B%EC%A7%91").unwrap();
        let url = Url::parse(&next).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("query".to_string(), "맛집".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("start".to_string(), "11".to_string())));
    }

    #[test]
    fn test_page_two_url_replaces_existing_paging_params() {
        let next = page_two_url("https://search.naver.com/s?query=cafe&page=5&start=41").unwrap();
        let url = Url::parse(&next).unwrap();
        let page: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "page")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(page, vec!["2"]);
    }

    #[test]
    fn test_page_two_url_rejects_non_http_current() {
        assert!(page_two_url("about:blank").is_none());
        assert!(page_two_url("not a url").is_none());
    }

    #[test]
    fn test_build_records_keeps_all_categories() {
        let accepted = vec![
            RawElement {
                text: "서울 맛집".into(),
                href: Some("/s?q=1".into()),
                image_alt: None,
                visible: true,
            },
            RawElement {
                text: "맛집 후기".into(),
                href: None,
                image_alt: None,
                visible: true,
            },
            RawElement {
                text: "저녁 메뉴".into(),
                href: None,
                image_alt: None,
                visible: true,
            },
        ];
        let records = build_records("맛집", accepted);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].category, KeywordCategory::Regional);
        assert_eq!(records[1].category, KeywordCategory::BlogReview);
        assert_eq!(records[2].category, KeywordCategory::General);
        let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }
}
