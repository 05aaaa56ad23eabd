//! Downstream persistence contract.
//!
//! The core consumes this trait, it does not implement real storage: the
//! relational layer lives with the caller. A sink is allowed to fail
//! without affecting the reported success of a scrape — the file written
//! by the processor is the durable record of truth.

use crate::model::KeywordRecord;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait KeywordSink: Send + Sync {
    async fn insert_keywords(&self, records: &[KeywordRecord]) -> Result<()>;
}

/// Sink that records the call and stores nothing. Default wiring for the
/// CLI, and a stand-in for tests.
pub struct NullSink;

#[async_trait]
impl KeywordSink for NullSink {
    async fn insert_keywords(&self, records: &[KeywordRecord]) -> Result<()> {
        debug!(count = records.len(), "null sink: discarding records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeywordCategory, KeywordType};

    #[tokio::test]
    async fn test_null_sink_accepts_records() {
        let sink = NullSink;
        let records = vec![KeywordRecord::new(
            "맛집",
            KeywordType::Autosuggest,
            KeywordCategory::Autosuggest,
            "서울 맛집",
            1,
        )];
        assert!(sink.insert_keywords(&records).await.is_ok());
    }
}
