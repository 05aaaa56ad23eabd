//! Post-collection processing: cleaning, statistics, and the file sink.
//!
//! The timestamped JSON file is the only durable output the core itself
//! produces; database persistence belongs to the caller's sink.

use crate::error::ScrapeError;
use crate::keyword::is_valid_keyword;
use crate::model::{CollectionRun, KeywordRecord, KeywordType};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

pub struct DataProcessor {
    output_dir: PathBuf,
}

impl DataProcessor {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Remove exact duplicates by `(query, keyword_type, text)`, trim text,
    /// and drop anything failing validation a second time. Collectors
    /// already validate; this is defense in depth at the merge boundary.
    /// Idempotent: cleaning a cleaned list is a no-op.
    pub fn clean(&self, records: Vec<KeywordRecord>) -> Vec<KeywordRecord> {
        let before = records.len();
        let mut seen: HashSet<(String, KeywordType, String)> = HashSet::new();
        let cleaned: Vec<KeywordRecord> = records
            .into_iter()
            .filter_map(|mut rec| {
                rec.text = rec.text.trim().to_string();
                if !is_valid_keyword(&rec.text, &rec.query) {
                    return None;
                }
                if !seen.insert(rec.dedupe_key()) {
                    return None;
                }
                Some(rec)
            })
            .collect();
        debug!(before, after = cleaned.len(), "records cleaned");
        cleaned
    }

    /// Summarize one run. `quality_issues` is filled by the orchestrator
    /// after threshold evaluation.
    pub fn generate_stats(
        &self,
        query: &str,
        started_at: DateTime<Utc>,
        duration_seconds: f64,
        records: Vec<KeywordRecord>,
    ) -> CollectionRun {
        let mut counts_by_type: BTreeMap<String, usize> = BTreeMap::new();
        let mut counts_by_category: BTreeMap<String, usize> = BTreeMap::new();
        for rec in &records {
            *counts_by_type
                .entry(rec.keyword_type.as_str().to_string())
                .or_default() += 1;
            *counts_by_category
                .entry(rec.category.as_str().to_string())
                .or_default() += 1;
        }

        CollectionRun {
            run_id: Uuid::new_v4(),
            query: query.to_string(),
            started_at,
            duration_seconds,
            records,
            counts_by_type,
            counts_by_category,
            quality_issues: Vec::new(),
        }
    }

    /// Write the records as a pretty-printed JSON array to
    /// `{output_dir}/keywords_{query}_{timestamp}.json`.
    pub fn save_to_file(
        &self,
        records: &[KeywordRecord],
        query: &str,
    ) -> Result<PathBuf, ScrapeError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ScrapeError::OutputFile {
            path: self.output_dir.clone(),
            source,
        })?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let filename = format!("keywords_{}_{timestamp}.json", file_safe(query));
        let path = self.output_dir.join(filename);

        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&path, json).map_err(|source| ScrapeError::OutputFile {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), count = records.len(), "results written");
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Keep letters, digits, and Hangul in a filename component; everything
/// else becomes an underscore.
fn file_safe(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeywordCategory;
    use tempfile::TempDir;

    fn rec(text: &str, kind: KeywordType) -> KeywordRecord {
        KeywordRecord::new("맛집", kind, KeywordCategory::General, text, 1)
    }

    #[test]
    fn test_clean_dedupes_by_type_and_text() {
        let processor = DataProcessor::new("unused");
        let records = vec![
            rec("서울 맛집", KeywordType::Autosuggest),
            rec("서울 맛집", KeywordType::Autosuggest),
            // Same text under a different type survives.
            rec("서울 맛집", KeywordType::RelatedKeywords),
        ];
        let cleaned = processor.clean(records);
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let processor = DataProcessor::new("unused");
        let records = vec![
            rec("서울 맛집", KeywordType::Autosuggest),
            rec("  부산 맛집  ", KeywordType::Autosuggest),
            rec("서울 맛집", KeywordType::Autosuggest),
            rec("x", KeywordType::Autosuggest), // too short, dropped
        ];
        let once = processor.clean(records);
        let twice = processor.clean(once.clone());
        let texts_once: Vec<&str> = once.iter().map(|r| r.text.as_str()).collect();
        let texts_twice: Vec<&str> = twice.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts_once, texts_twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_clean_revalidates_against_query() {
        let processor = DataProcessor::new("unused");
        // Echo of the run query must not survive the merge.
        let echo = KeywordRecord::new(
            "맛집",
            KeywordType::HotTopics,
            KeywordCategory::General,
            "맛집",
            1,
        );
        assert!(processor.clean(vec![echo]).is_empty());
    }

    #[test]
    fn test_generate_stats_counts() {
        let processor = DataProcessor::new("unused");
        let records = vec![
            rec("서울 맛집", KeywordType::Autosuggest),
            rec("부산 맛집", KeywordType::Autosuggest),
            rec("근처 맛집", KeywordType::RelatedKeywords),
        ];
        let run = processor.generate_stats("맛집", Utc::now(), 12.0, records);
        assert_eq!(run.counts_by_type.get("autosuggest"), Some(&2));
        assert_eq!(run.counts_by_type.get("related_keywords"), Some(&1));
        assert_eq!(run.counts_by_category.get("general"), Some(&3));
        assert_eq!(run.records.len(), 3);
        assert!(run.quality_issues.is_empty());
    }

    #[test]
    fn test_save_to_file_writes_json_array() {
        let dir = TempDir::new().unwrap();
        let processor = DataProcessor::new(dir.path());
        let records = vec![rec("서울 맛집", KeywordType::Autosuggest)];

        let path = processor.save_to_file(&records, "맛집").unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("keywords_맛집_"));
        assert!(name.ends_with(".json"));

        let body = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<KeywordRecord> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].text, "서울 맛집");
    }

    #[test]
    fn test_file_safe_replaces_separators() {
        assert_eq!(file_safe("카페 창업/비용"), "카페_창업_비용");
        assert_eq!(file_safe("plain123"), "plain123");
    }
}
