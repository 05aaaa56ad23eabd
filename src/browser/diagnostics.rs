//! Failure-path DOM diagnostics.
//!
//! When the related-searches section cannot be located at all, the trailing
//! page structure is summarized and logged so an operator can spot the
//! renamed block and prepend a new selector. Operator-facing only; nothing
//! here affects the run result.

use scraper::{Html, Selector};
use tracing::info;

/// Compact description of one block-level element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSummary {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text_preview: String,
}

const PREVIEW_CHARS: usize = 60;

/// Summarize the last `limit` block-level elements of an HTML document.
pub fn summarize_tail(html: &str, limit: usize) -> Vec<ElementSummary> {
    let document = Html::parse_document(html);
    let block_sel = Selector::parse("div, section, ul, ol, footer, article, aside").unwrap();

    let mut summaries: Vec<ElementSummary> = document
        .select(&block_sel)
        .map(|el| {
            let value = el.value();
            let text: String = el.text().collect::<String>();
            let compact = text.split_whitespace().collect::<Vec<_>>().join(" ");
            ElementSummary {
                tag: value.name().to_string(),
                id: value.attr("id").map(str::to_string),
                classes: value.classes().map(str::to_string).collect(),
                text_preview: compact.chars().take(PREVIEW_CHARS).collect(),
            }
        })
        .collect();

    let keep_from = summaries.len().saturating_sub(limit);
    summaries.split_off(keep_from)
}

/// Log the trailing DOM structure at info level, one line per element.
pub fn log_dom_tail(html: &str, limit: usize) {
    for (i, el) in summarize_tail(html, limit).iter().enumerate() {
        info!(
            index = i,
            tag = %el.tag,
            id = el.id.as_deref().unwrap_or("-"),
            classes = %el.classes.join("."),
            text = %el.text_preview,
            "trailing dom element"
        );
    }
}
