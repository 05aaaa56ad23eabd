//! Ordered selector-fallback resolution.
//!
//! The primary defense against DOM drift on the target site: an ordered
//! list of locator expressions, earlier ones previously observed and more
//! specific, later ones looser. The first expression yielding at least one
//! visible element whose text passes validation wins. Exhausting the list
//! is a normal outcome, not an error, so markup fixes stay additive — new
//! observations go at the front, old ones keep working as fallbacks.

use crate::browser::{BrowserSession, RawElement};
use crate::error::ScrapeError;
use tracing::debug;

/// The elements produced by the winning expression, plus the expression
/// itself for diagnostics.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub elements: Vec<RawElement>,
    pub selector: String,
}

/// An ordered list of candidate locator expressions. Section scoping is
/// written into the expressions themselves as descendant selectors.
pub struct SelectorChain {
    candidates: Vec<String>,
}

impl SelectorChain {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Try each expression in order; return the first non-empty validated
    /// set, or `None` when every expression comes up empty.
    pub async fn resolve<F>(
        &self,
        session: &BrowserSession,
        validate: F,
    ) -> Result<Option<Resolution>, ScrapeError>
    where
        F: Fn(&str) -> bool,
    {
        for candidate in &self.candidates {
            let raw = session.extract_elements(candidate).await?;
            let found = raw.len();
            let kept = accept_candidates(raw, &validate);
            if !kept.is_empty() {
                debug!(
                    selector = %candidate,
                    found,
                    accepted = kept.len(),
                    "selector chain resolved"
                );
                return Ok(Some(Resolution {
                    elements: kept,
                    selector: candidate.clone(),
                }));
            }
        }
        debug!(tried = self.candidates.len(), "selector chain exhausted");
        Ok(None)
    }
}

/// Acceptance filter shared by every chain: keep visible elements whose
/// trimmed text passes the validator, and normalize the text in place.
pub fn accept_candidates<F>(raw: Vec<RawElement>, validate: &F) -> Vec<RawElement>
where
    F: Fn(&str) -> bool,
{
    raw.into_iter()
        .filter_map(|mut el| {
            if !el.visible {
                return None;
            }
            let trimmed = el.text.trim();
            if !validate(trimmed) {
                return None;
            }
            el.text = trimmed.to_string();
            Some(el)
        })
        .collect()
}
