//! Core data model — keyword records and per-run aggregates.
//!
//! A [`KeywordRecord`] is one extracted, validated, and categorized keyword
//! candidate. Records are created once by a collector and never mutated.
//! A [`CollectionRun`] is the aggregated result of one end-to-end scrape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Which collector produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordType {
    Autosuggest,
    TogetherSearched,
    HotTopics,
    RelatedKeywords,
}

impl KeywordType {
    /// Stable string form, used for log fields and stat map keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autosuggest => "autosuggest",
            Self::TogetherSearched => "together_searched",
            Self::HotTopics => "hot_topics",
            Self::RelatedKeywords => "related_keywords",
        }
    }

    /// All collector types, in pipeline order.
    pub fn all() -> [KeywordType; 4] {
        [
            Self::Autosuggest,
            Self::TogetherSearched,
            Self::HotTopics,
            Self::RelatedKeywords,
        ]
    }
}

/// Keyword category assigned by the classifier.
///
/// Autosuggest records bypass the classifier entirely and carry the literal
/// `자동완성` tag the downstream dashboard groups them under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordCategory {
    #[serde(rename = "location-based")]
    LocationBased,
    #[serde(rename = "regional")]
    Regional,
    #[serde(rename = "blog-review")]
    BlogReview,
    #[serde(rename = "general")]
    General,
    #[serde(rename = "자동완성")]
    Autosuggest,
}

impl KeywordCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocationBased => "location-based",
            Self::Regional => "regional",
            Self::BlogReview => "blog-review",
            Self::General => "general",
            Self::Autosuggest => "자동완성",
        }
    }

    /// Whether this category carries geographic intent. The results-page
    /// collectors keep only these (documented product filter).
    pub fn is_geo(&self) -> bool {
        matches!(self, Self::LocationBased | Self::Regional)
    }
}

/// One extracted keyword candidate. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// The search term this run was executed for.
    pub query: String,
    /// Which collector produced the record.
    pub keyword_type: KeywordType,
    /// Classifier output (or the fixed autosuggest tag).
    pub category: KeywordCategory,
    /// The candidate keyword, trimmed, 2–30 chars.
    pub text: String,
    /// Link target, present only for link-based blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Alt text of an accompanying image, when the block carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    /// 1-based position within the (query, keyword_type, group) stream,
    /// assigned in discovery order over *kept* records.
    pub rank: u32,
    /// Page/slide grouping. Current collectors always emit 1.
    pub group: u32,
    pub collected_at: DateTime<Utc>,
}

impl KeywordRecord {
    /// Build a record at the next rank of a partition. `rank` is the number
    /// of records already appended to that partition plus one.
    pub fn new(
        query: &str,
        keyword_type: KeywordType,
        category: KeywordCategory,
        text: &str,
        rank: u32,
    ) -> Self {
        Self {
            query: query.to_string(),
            keyword_type,
            category,
            text: text.trim().to_string(),
            href: None,
            image_alt: None,
            rank,
            group: 1,
            collected_at: Utc::now(),
        }
    }

    pub fn with_href(mut self, href: Option<String>) -> Self {
        self.href = href.filter(|h| !h.is_empty());
        self
    }

    pub fn with_image_alt(mut self, alt: Option<String>) -> Self {
        self.image_alt = alt.filter(|a| !a.is_empty());
        self
    }

    /// Deduplication identity: `(query, keyword_type, text)`.
    pub fn dedupe_key(&self) -> (String, KeywordType, String) {
        (self.query.clone(), self.keyword_type, self.text.clone())
    }
}

/// Aggregated result and statistics of one `scrape()` invocation.
/// Built at run end, written to a sink, never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRun {
    pub run_id: Uuid,
    pub query: String,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub records: Vec<KeywordRecord>,
    pub counts_by_type: BTreeMap<String, usize>,
    pub counts_by_category: BTreeMap<String, usize>,
    /// Human-readable threshold violations. Non-fatal.
    pub quality_issues: Vec<String>,
}

/// Structured result envelope returned by the orchestrator.
///
/// Callers always receive this — never a raw error — except that session
/// launch and navigation failures flip `success` and clear `data`.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeOutcome {
    pub success: bool,
    pub data: Vec<KeywordRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CollectionRun>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeOutcome {
    /// Failure envelope: no data, no file, the error message carried along.
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            filepath: None,
            stats: None,
            error: Some(error.to_string()),
        }
    }
}
