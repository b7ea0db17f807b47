use crate::core::BrowserTrait;
use crate::errors::{Result, SuiteError};
use std::time::{Duration, Instant};

/// Explicit readiness waits over the scripted browser.
///
/// Every wait here polls an observable page condition; nothing in the suite
/// sleeps for a fixed interval and hopes the page caught up.
pub struct NavigationManager;

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub ready_state: String,
    pub duration_ms: u64,
}

impl NavigationManager {
    /// Wait until the document reports itself interactive or complete.
    pub async fn wait_for_ready<B: BrowserTrait>(
        browser: &B,
        tab: &B::TabHandle,
        timeout_ms: u64,
        poll_interval_ms: u64,
    ) -> Result<NavigationResult> {
        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        let probe = r#"
            (function() {
                return {
                    readyState: document.readyState,
                    url: window.location.href
                };
            })()
        "#;

        while start.elapsed() < timeout {
            if let Ok(result) = browser.execute_script(tab, probe).await {
                if let Some(obj) = result.as_object() {
                    let ready_state = obj
                        .get("readyState")
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string();
                    if ready_state == "interactive" || ready_state == "complete" {
                        return Ok(NavigationResult {
                            url: obj
                                .get("url")
                                .and_then(|v| v.as_str())
                                .unwrap_or("")
                                .to_string(),
                            ready_state,
                            duration_ms: start.elapsed().as_millis() as u64,
                        });
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(poll_interval_ms)).await;
        }

        Err(SuiteError::Timeout(format!(
            "document not ready after {}ms",
            timeout_ms
        )))
    }

    /// Poll a boolean JavaScript expression until it holds or the timeout
    /// expires. Expiry is reported as `Ok(false)`, not as an error.
    pub async fn wait_for_condition<B: BrowserTrait>(
        browser: &B,
        tab: &B::TabHandle,
        condition: &str,
        timeout_ms: u64,
        poll_interval_ms: u64,
    ) -> Result<bool> {
        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        loop {
            let result = browser.execute_script(tab, condition).await?;
            if result.as_bool().unwrap_or(false) {
                return Ok(true);
            }
            if start.elapsed() >= timeout {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(poll_interval_ms)).await;
        }
    }

    /// Wait until a selector matches a visible element.
    pub async fn wait_for_visible<B: BrowserTrait>(
        browser: &B,
        tab: &B::TabHandle,
        selector: &str,
        timeout_ms: u64,
        poll_interval_ms: u64,
    ) -> Result<bool> {
        let condition = visibility_probe(selector);
        Self::wait_for_condition(browser, tab, &condition, timeout_ms, poll_interval_ms).await
    }

    /// Wait until a selector matches any element, visible or not.
    pub async fn wait_for_attached<B: BrowserTrait>(
        browser: &B,
        tab: &B::TabHandle,
        selector: &str,
        timeout_ms: u64,
        poll_interval_ms: u64,
    ) -> Result<bool> {
        let condition = format!(
            "!!document.querySelector('{}')",
            escape_selector(selector)
        );
        Self::wait_for_condition(browser, tab, &condition, timeout_ms, poll_interval_ms).await
    }
}

/// Boolean expression testing that a selector matches a rendered element.
pub fn visibility_probe(selector: &str) -> String {
    format!(
        r#"
        (function() {{
            const el = document.querySelector('{}');
            if (!el) return false;
            const rect = el.getBoundingClientRect();
            const style = window.getComputedStyle(el);
            return rect.width > 0 && rect.height > 0
                && style.visibility !== 'hidden'
                && style.display !== 'none';
        }})()
        "#,
        escape_selector(selector)
    )
}

/// Escape a CSS selector for embedding in a single-quoted JS string.
pub fn escape_selector(selector: &str) -> String {
    selector.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_single_quotes_in_selectors() {
        assert_eq!(
            escape_selector("input[name='_nkw']"),
            "input[name=\\'_nkw\\']"
        );
    }

    #[test]
    fn visibility_probe_embeds_selector() {
        let probe = visibility_probe(".srp-results");
        assert!(probe.contains("querySelector('.srp-results')"));
    }
}
