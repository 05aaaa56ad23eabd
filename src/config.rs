//! Scraper configuration — plain scalar knobs, all CLI-overridable.

use crate::model::KeywordType;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default desktop Chrome user-agent sent by the browser session.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// All tunables for one scraper instance.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Run the browser headless. Disable for local debugging.
    pub headless: bool,
    /// Maximum result pages any collector may visit.
    pub max_pages: u32,
    /// Deadline for navigations and element-condition polls.
    pub wait_timeout_ms: u64,
    /// Interval between element-condition polls.
    pub poll_interval_ms: u64,
    /// Settle wait for the autosuggest dropdown after typing. The dropdown
    /// offers no pollable completion signal, so this one stays fixed.
    pub suggest_settle_ms: u64,
    /// Randomized inter-action delay window, milliseconds.
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    /// Directory the timestamped result files are written to.
    pub output_dir: PathBuf,
    pub user_agent: String,
    /// Explicit Chromium binary. When unset, discovery runs (env var, local
    /// cache dir, system PATH).
    pub chrome_path: Option<PathBuf>,
    pub quality: QualityThresholds,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            max_pages: 2,
            wait_timeout_ms: 10_000,
            poll_interval_ms: 250,
            suggest_settle_ms: 1_500,
            delay_min_ms: 500,
            delay_max_ms: 1_500,
            output_dir: PathBuf::from("output"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_path: None,
            quality: QualityThresholds::default(),
        }
    }
}

impl ScraperConfig {
    /// Normalize inconsistent settings instead of rejecting them: a swapped
    /// delay window is reordered, a zero poll interval is bumped to 50ms.
    pub fn normalized(mut self) -> Self {
        if self.delay_min_ms > self.delay_max_ms {
            std::mem::swap(&mut self.delay_min_ms, &mut self.delay_max_ms);
        }
        if self.poll_interval_ms == 0 {
            self.poll_interval_ms = 50;
        }
        self
    }
}

/// Minimum accepted counts per collector plus a wall-clock ceiling.
/// Violations are reported as strings on the run, never as failures.
#[derive(Debug, Clone)]
pub struct QualityThresholds {
    pub min_autosuggest: usize,
    pub min_together_searched: usize,
    pub min_hot_topics: usize,
    pub min_related_keywords: usize,
    pub max_duration_secs: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_autosuggest: 6,
            min_together_searched: 3,
            min_hot_topics: 3,
            min_related_keywords: 5,
            max_duration_secs: 120.0,
        }
    }
}

impl QualityThresholds {
    fn min_for(&self, kind: KeywordType) -> usize {
        match kind {
            KeywordType::Autosuggest => self.min_autosuggest,
            KeywordType::TogetherSearched => self.min_together_searched,
            KeywordType::HotTopics => self.min_hot_topics,
            KeywordType::RelatedKeywords => self.min_related_keywords,
        }
    }

    /// Evaluate per-type counts and duration against the thresholds.
    /// Returns one human-readable line per violation.
    pub fn evaluate(
        &self,
        counts_by_type: &BTreeMap<String, usize>,
        duration_seconds: f64,
    ) -> Vec<String> {
        let mut issues = Vec::new();
        for kind in KeywordType::all() {
            let want = self.min_for(kind);
            let got = counts_by_type.get(kind.as_str()).copied().unwrap_or(0);
            if got < want {
                issues.push(format!(
                    "{}: collected {got} keywords, expected at least {want}",
                    kind.as_str()
                ));
            }
        }
        if duration_seconds > self.max_duration_secs {
            issues.push(format!(
                "run took {duration_seconds:.1}s, exceeding the {:.0}s ceiling",
                self.max_duration_secs
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_swaps_delay_window() {
        let cfg = ScraperConfig {
            delay_min_ms: 2_000,
            delay_max_ms: 100,
            ..Default::default()
        }
        .normalized();
        assert_eq!(cfg.delay_min_ms, 100);
        assert_eq!(cfg.delay_max_ms, 2_000);
    }

    #[test]
    fn test_quality_reports_shortfall_per_type() {
        let q = QualityThresholds::default();
        let mut counts = BTreeMap::new();
        counts.insert("autosuggest".to_string(), 2usize);
        counts.insert("together_searched".to_string(), 5usize);
        counts.insert("hot_topics".to_string(), 3usize);
        counts.insert("related_keywords".to_string(), 9usize);

        let issues = q.evaluate(&counts, 30.0);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("autosuggest"));
        assert!(issues[0].contains("expected at least 6"));
    }

    #[test]
    fn test_quality_reports_duration_ceiling() {
        let q = QualityThresholds {
            max_duration_secs: 10.0,
            ..Default::default()
        };
        let mut counts = BTreeMap::new();
        for kind in KeywordType::all() {
            counts.insert(kind.as_str().to_string(), 100usize);
        }
        let issues = q.evaluate(&counts, 12.5);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("12.5s"));
    }

    #[test]
    fn test_quality_clean_run_has_no_issues() {
        let q = QualityThresholds::default();
        let mut counts = BTreeMap::new();
        for kind in KeywordType::all() {
            counts.insert(kind.as_str().to_string(), 10usize);
        }
        assert!(q.evaluate(&counts, 45.0).is_empty());
    }
}
