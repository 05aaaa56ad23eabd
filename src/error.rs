//! Error taxonomy.
//!
//! Two tiers, matching the recovery policy: [`CollectorError`] is trapped at
//! the collector boundary and mapped to an empty result by the orchestrator;
//! [`ScrapeError`] is fatal at the session level and surfaces as a failure
//! envelope. A selector chain exhausting its candidates is *neither* — that
//! is a normal empty resolution, not an error.

use std::path::PathBuf;
use thiserror::Error;

/// Session-level failures. Fatal: the orchestrator tears the browser down
/// and returns a failure envelope.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("chromium binary not found; set NAVER_KEYWORDS_CHROME_PATH or install chromium")]
    ChromiumNotFound,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("script result had unexpected shape: {0}")]
    ScriptResult(String),

    #[error("failed to write output file {path}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures inside a single collector. Never abort the run: the orchestrator
/// logs these and substitutes an empty result.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error(transparent)]
    Session(#[from] ScrapeError),

    #[error("extraction script failed: {0}")]
    Extraction(String),
}
