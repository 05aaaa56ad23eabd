//! Keyword-suggestion collector for Naver search.
//!
//! Naver exposes its autosuggest, "people also search", trending-topics,
//! and related-searches data only through rendered pages, so this crate
//! drives a headless Chromium through the search flow and extracts
//! structured keyword candidates from the DOM. The pipeline isolates
//! failures per collector and defends against markup drift with ordered
//! selector fallbacks.

pub mod browser;
pub mod collectors;
pub mod config;
pub mod error;
pub mod jitter;
pub mod keyword;
pub mod model;
pub mod processor;
pub mod scraper;
pub mod sink;

pub use config::{QualityThresholds, ScraperConfig};
pub use error::{CollectorError, ScrapeError};
pub use model::{CollectionRun, KeywordCategory, KeywordRecord, KeywordType, ScrapeOutcome};
pub use scraper::NaverKeywordScraper;
