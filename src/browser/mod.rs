//! Browser session — one headless Chromium instance, one page.
//!
//! All page interaction goes through sanitized JavaScript evaluation over
//! CDP. The session is exclusively owned by the orchestrator for the
//! lifetime of a scrape; collectors only ever borrow it, which keeps the
//! shared page a single-owner handle by construction.

pub mod diagnostics;
pub mod selector;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One element surfaced by an extraction script, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawElement {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub image_alt: Option<String>,
    #[serde(default)]
    pub visible: bool,
}

/// Find the Chromium binary: explicit config, env override, local cache
/// directory, then system PATH.
pub fn find_chromium(config: &ScraperConfig) -> Option<PathBuf> {
    if let Some(path) = &config.chrome_path {
        return Some(path.clone());
    }

    if let Ok(p) = std::env::var("NAVER_KEYWORDS_CHROME_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidates = [
            home.join(".naver-keywords/chromium/chrome-linux64/chrome"),
            home.join(".naver-keywords/chromium/chrome"),
        ];
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    None
}

/// A launched browser with its single page.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    wait_timeout_ms: u64,
    poll_interval_ms: u64,
}

impl BrowserSession {
    /// Launch headless Chromium with the sandbox flags the container
    /// environment requires, open one page, and set the client identity.
    /// A launch failure is fatal and propagates; there is no retry.
    pub async fn launch(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let chrome_path = find_chromium(config).ok_or(ScrapeError::ChromiumNotFound)?;
        debug!(path = %chrome_path.display(), "launching chromium");

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--lang=ko-KR")
            .arg(format!("--user-agent={}", config.user_agent));
        if config.headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        let browser_config = builder
            .build()
            .map_err(|e| ScrapeError::Launch(format!("bad browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        // Drive the CDP event stream for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // Partially started: tear the browser down before failing.
                let mut browser = browser;
                let _ = browser.close().await;
                handler_task.abort();
                return Err(ScrapeError::Launch(format!("failed to open page: {e}")));
            }
        };

        Ok(Self {
            browser,
            page,
            handler_task,
            wait_timeout_ms: config.wait_timeout_ms,
            poll_interval_ms: config.poll_interval_ms,
        })
    }

    /// Tear the browser down. Runs on every exit path; errors are logged,
    /// never propagated.
    pub async fn close(mut self) {
        if let Err(e) = self.page.close().await {
            debug!(error = %e, "page close failed");
        }
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        self.handler_task.abort();
    }

    /// Navigate and wait for the load to settle, bounded by the configured
    /// timeout. A failed or timed-out required navigation is fatal.
    pub async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        let timeout = Duration::from_millis(self.wait_timeout_ms);
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: self.wait_timeout_ms,
            }),
        }
    }

    /// Wait for an in-flight navigation (after a click or form submit).
    pub async fn settle_navigation(&self) {
        let timeout = Duration::from_millis(self.wait_timeout_ms);
        let _ = tokio::time::timeout(timeout, self.page.wait_for_navigation()).await;
    }

    pub async fn current_url(&self) -> Result<String, ScrapeError> {
        let url = self
            .page
            .url()
            .await?
            .map(|u| u.to_string())
            .unwrap_or_default();
        Ok(url)
    }

    /// Evaluate a script and deserialize its JSON result.
    pub async fn eval_into<T: serde::de::DeserializeOwned>(
        &self,
        script: &str,
    ) -> Result<T, ScrapeError> {
        let result = self.page.evaluate(script).await?;
        result
            .into_value()
            .map_err(|e| ScrapeError::ScriptResult(format!("{e:?}")))
    }

    /// Full page HTML, for the failure-path DOM diagnostics.
    pub async fn page_html(&self) -> Result<String, ScrapeError> {
        self.eval_into("document.documentElement.outerHTML").await
    }

    /// Poll for a selector to appear, with a deadline. Returns `false` on
    /// deadline expiry — absence is a reportable outcome, not an error.
    pub async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<bool, ScrapeError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let script = format!(
            "(() => {{ try {{ return !!document.querySelector('{}'); }} catch (e) {{ return false; }} }})()",
            escape_js(selector)
        );
        loop {
            if self.eval_into::<bool>(&script).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(self.poll_interval_ms)).await;
        }
    }

    /// Focus the first present input among `selectors`, clear it, and type
    /// `text` with the input events the suggestion layer listens for.
    /// Returns `false` when no candidate input exists.
    pub async fn type_into(&self, selectors: &[&str], text: &str) -> Result<bool, ScrapeError> {
        let script = format!(
            r#"(() => {{
                try {{
                    const sels = [{}];
                    for (const s of sels) {{
                        const el = document.querySelector(s);
                        if (!el) continue;
                        el.focus();
                        el.value = '';
                        el.value = '{}';
                        el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                        el.dispatchEvent(new KeyboardEvent('keyup', {{ bubbles: true }}));
                        return true;
                    }}
                    return false;
                }} catch (e) {{ return false; }}
            }})()"#,
            js_string_array(selectors),
            escape_js(text)
        );
        self.eval_into(&script).await
    }

    /// Submit the form owning the first present input among `selectors`.
    /// Returns `false` when no input with a form is found.
    pub async fn submit_form_of(&self, selectors: &[&str]) -> Result<bool, ScrapeError> {
        let script = format!(
            r#"(() => {{
                try {{
                    const sels = [{}];
                    for (const s of sels) {{
                        const el = document.querySelector(s);
                        if (el && el.form) {{ el.form.submit(); return true; }}
                    }}
                    return false;
                }} catch (e) {{ return false; }}
            }})()"#,
            js_string_array(selectors)
        );
        self.eval_into(&script).await
    }

    /// Click the first link or button inside any of `containers` whose
    /// trimmed text equals `text`. Returns whether a click happened.
    pub async fn click_text_in(&self, containers: &[&str], text: &str) -> Result<bool, ScrapeError> {
        let script = format!(
            r#"(() => {{
                try {{
                    const sels = [{}];
                    for (const s of sels) {{
                        for (const c of document.querySelectorAll(s)) {{
                            for (const el of c.querySelectorAll('a, button')) {{
                                if ((el.innerText || '').trim() === '{}') {{
                                    el.click();
                                    return true;
                                }}
                            }}
                        }}
                    }}
                    return false;
                }} catch (e) {{ return false; }}
            }})()"#,
            js_string_array(containers),
            escape_js(text)
        );
        self.eval_into(&script).await
    }

    /// Scroll from top to bottom in viewport-half steps, giving lazy-loaded
    /// sections a chance to render.
    pub async fn scroll_to_bottom(&self) -> Result<(), ScrapeError> {
        let script = r#"(async () => {
            const step = Math.max(200, Math.floor(window.innerHeight / 2));
            let y = 0;
            const max = document.body.scrollHeight;
            while (y < max) {
                window.scrollTo(0, y);
                y += step;
                await new Promise(r => setTimeout(r, 120));
            }
            window.scrollTo(0, document.body.scrollHeight);
            return true;
        })()"#;
        let _: bool = self.eval_into(script).await?;
        Ok(())
    }

    /// Extract every element matching `selector`. Section scoping is
    /// expressed in the selector itself (descendant expressions). Each hit
    /// carries its visible text (falling back to a nested title element
    /// when the node itself has none), link target, image alt, and
    /// computed visibility. A selector the page rejects yields an empty
    /// list, not an error.
    pub async fn extract_elements(&self, selector: &str) -> Result<Vec<RawElement>, ScrapeError> {
        let script = format!(
            r#"(() => {{
                try {{
                    const out = [];
                    for (const el of document.querySelectorAll('{}')) {{
                        const rect = el.getBoundingClientRect();
                        const style = window.getComputedStyle(el);
                        const visible = rect.width > 0 && rect.height > 0
                            && style.visibility !== 'hidden' && style.display !== 'none';
                        let text = (el.innerText || el.textContent || '').trim();
                        if (!text) {{
                            const tit = el.querySelector('.tit, .keyword, .elss, span');
                            if (tit) text = (tit.innerText || '').trim();
                        }}
                        const link = el.matches('a') ? el : el.querySelector('a');
                        const img = el.querySelector('img');
                        out.push({{
                            text,
                            href: link ? link.getAttribute('href') : null,
                            image_alt: img ? img.getAttribute('alt') : null,
                            visible,
                        }});
                    }}
                    return out;
                }} catch (e) {{ return []; }}
            }})()"#,
            escape_js(selector)
        );
        self.eval_into(&script).await
    }

    /// Loosest related-section fallback: find a heading whose text contains
    /// any of `words`, walk up to its enclosing block, and extract its links.
    pub async fn extract_links_near_heading(
        &self,
        words: &[&str],
    ) -> Result<Vec<RawElement>, ScrapeError> {
        let script = format!(
            r#"(() => {{
                try {{
                    const words = [{}];
                    const headings = document.querySelectorAll('h2, h3, h4, strong, .tit, .api_title');
                    for (const h of headings) {{
                        const label = (h.innerText || '').trim();
                        if (!words.some(w => label.includes(w))) continue;
                        const section = h.closest('section, div, ul, footer');
                        if (!section) continue;
                        const out = [];
                        for (const el of section.querySelectorAll('a')) {{
                            const rect = el.getBoundingClientRect();
                            const style = window.getComputedStyle(el);
                            const visible = rect.width > 0 && rect.height > 0
                                && style.visibility !== 'hidden' && style.display !== 'none';
                            let text = (el.innerText || el.textContent || '').trim();
                            if (!text) {{
                                const tit = el.querySelector('.tit, .keyword, .elss, span');
                                if (tit) text = (tit.innerText || '').trim();
                            }}
                            const img = el.querySelector('img');
                            out.push({{
                                text,
                                href: el.getAttribute('href'),
                                image_alt: img ? img.getAttribute('alt') : null,
                                visible,
                            }});
                        }}
                        if (out.length) return out;
                    }}
                    return [];
                }} catch (e) {{ return []; }}
            }})()"#,
            js_string_array(words)
        );
        self.eval_into(&script).await
    }
}

/// Escape a value for injection into a single-quoted JS string literal.
pub fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '`' => out.push_str("\\`"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => {}
            '<' => out.push_str("\\x3c"),
            '>' => out.push_str("\\x3e"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render `items` as a comma-separated list of quoted JS string literals.
fn js_string_array(items: &[&str]) -> String {
    items
        .iter()
        .map(|s| format!("'{}'", escape_js(s)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_js_quotes_and_control() {
        assert_eq!(escape_js("plain"), "plain");
        assert_eq!(escape_js("it's"), "it\\'s");
        assert_eq!(escape_js("a\"b"), "a\\\"b");
        assert_eq!(escape_js("line\nbreak"), "line\\nbreak");
        assert_eq!(escape_js("null\0byte"), "nullbyte");
    }

    #[test]
    fn test_escape_js_blocks_script_injection() {
        let hostile = "</script><script>alert(1)</script>";
        let escaped = escape_js(hostile);
        assert!(!escaped.contains("</script>"));
        assert!(escaped.contains("\\x3c/script\\x3e"));
    }

    #[test]
    fn test_js_string_array() {
        assert_eq!(js_string_array(&["a", "b'c"]), "'a', 'b\\'c'");
        assert_eq!(js_string_array(&[]), "");
    }

    #[test]
    fn test_raw_element_deserializes_with_missing_fields() {
        let el: RawElement = serde_json::from_str(r#"{"text":"서울 맛집"}"#).unwrap();
        assert_eq!(el.text, "서울 맛집");
        assert_eq!(el.href, None);
        assert!(!el.visible);
    }

    #[tokio::test]
    #[ignore] // Requires a local Chromium install.
    async fn test_launch_navigate_extract() {
        let config = ScraperConfig::default();
        let session = BrowserSession::launch(&config).await.expect("launch failed");
        session
            .goto("data:text/html,<ul><li><a href='/a'>첫번째 항목</a></li></ul>")
            .await
            .expect("navigation failed");
        let items = session.extract_elements("ul li").await.expect("extract failed");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "첫번째 항목");
        session.close().await;
    }
}
