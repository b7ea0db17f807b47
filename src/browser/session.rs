use crate::core::{BrowserTrait, Config};
use crate::errors::{Result, SuiteError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::navigation::{escape_selector, visibility_probe, NavigationManager, NavigationResult};

/// One scripted browser session: a launched browser, one active tab, and the
/// base-page primitive set every page object is built from.
pub struct BrowserSession<B: BrowserTrait> {
    browser: Arc<B>,
    tab: Option<B::TabHandle>,
    config: Config,
    session_id: String,
}

/// Persisted authentication state, the suite's equivalent of a stored
/// browser profile. Written once by the auth bootstrap, reloaded on every
/// subsequent run so tests start signed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: String,
    pub domain: String,
    pub url: String,
    pub cookies: Vec<CookieData>,
    pub local_storage: HashMap<String, String>,
    pub user_agent: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieData {
    pub name: String,
    pub value: String,
}

impl<B: BrowserTrait> BrowserSession<B> {
    pub async fn new(mut browser: B, config: Config) -> Result<Self> {
        browser.launch(&config).await?;
        let tab = browser.new_tab().await?;
        let browser = Arc::new(browser);
        let session_id = uuid::Uuid::new_v4().to_string();

        Ok(Self {
            browser,
            tab: Some(tab),
            config,
            session_id,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn tab(&self) -> Result<&B::TabHandle> {
        self.tab.as_ref().ok_or(SuiteError::NoActiveTab)
    }

    /// Replace the active tab with a fresh one. Cart items run in their own
    /// tab so a broken product page cannot leak state into the next item.
    pub async fn fresh_tab(&mut self) -> Result<()> {
        if let Some(old) = self.tab.take() {
            let _ = self.browser.close_tab(&old).await;
        }
        self.tab = Some(self.browser.new_tab().await?);
        Ok(())
    }

    pub async fn navigate_and_wait(&self, url: &str) -> Result<NavigationResult> {
        let tab = self.tab()?;
        info!(%url, "Navigating");
        self.browser.navigate(tab, url).await?;
        NavigationManager::wait_for_ready(
            self.browser.as_ref(),
            tab,
            self.config.session.navigation_timeout_ms,
            self.config.session.poll_interval_ms,
        )
        .await
    }

    pub async fn execute(&self, script: &str) -> Result<Value> {
        let tab = self.tab()?;
        self.browser.execute_script(tab, script).await
    }

    pub async fn current_url(&self) -> Result<String> {
        let tab = self.tab()?;
        self.browser.get_url(tab).await
    }

    /// Wait for the selector to become visible, then click it.
    pub async fn click(&self, selector: &str) -> Result<()> {
        if !self
            .wait_for_visible(selector, self.config.session.element_timeout_ms)
            .await?
        {
            return Err(SuiteError::ElementNotFound(selector.to_string()));
        }

        let script = format!(
            r#"
            (function() {{
                const el = document.querySelector('{}');
                if (!el) return {{ success: false }};
                el.scrollIntoView({{ block: 'center' }});
                el.click();
                return {{ success: true }};
            }})()
            "#,
            escape_selector(selector)
        );

        let result = self.execute(&script).await?;
        if result
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            debug!(%selector, "Clicked element");
            Ok(())
        } else {
            Err(SuiteError::ElementNotFound(selector.to_string()))
        }
    }

    /// Wait for the selector to become visible, then set its value the way a
    /// user would: focus, assign, and fire input/change events.
    pub async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        if !self
            .wait_for_visible(selector, self.config.session.element_timeout_ms)
            .await?
        {
            return Err(SuiteError::ElementNotFound(selector.to_string()));
        }

        let script = format!(
            r#"
            (function() {{
                const el = document.querySelector('{}');
                if (!el) return {{ success: false }};
                el.focus();
                el.value = '{}';
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return {{ success: true, value: el.value }};
            }})()
            "#,
            escape_selector(selector),
            escape_text(text)
        );

        let result = self.execute(&script).await?;
        if result
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            debug!(%selector, "Filled element");
            Ok(())
        } else {
            Err(SuiteError::ElementNotFound(selector.to_string()))
        }
    }

    /// Dispatch a keydown/keyup pair on the selector's element.
    pub async fn press_key(&self, selector: &str, key: &str) -> Result<()> {
        let script = format!(
            r#"
            (function() {{
                const el = document.querySelector('{}') || document.body;
                const opts = {{ key: '{}', bubbles: true, cancelable: true }};
                el.dispatchEvent(new KeyboardEvent('keydown', opts));
                el.dispatchEvent(new KeyboardEvent('keyup', opts));
                return true;
            }})()
            "#,
            escape_selector(selector),
            escape_text(key)
        );
        self.execute(&script).await?;
        Ok(())
    }

    pub async fn press_escape(&self) -> Result<()> {
        self.press_key("body", "Escape").await
    }

    /// Visible text of the first element matching the selector.
    pub async fn inner_text(&self, selector: &str) -> Result<String> {
        if !self
            .wait_for_visible(selector, self.config.session.element_timeout_ms)
            .await?
        {
            return Err(SuiteError::ElementNotFound(selector.to_string()));
        }

        let script = format!(
            r#"
            (function() {{
                const el = document.querySelector('{}');
                return el ? el.innerText : null;
            }})()
            "#,
            escape_selector(selector)
        );

        match self.execute(&script).await? {
            Value::String(text) => Ok(text),
            _ => Err(SuiteError::ElementNotFound(selector.to_string())),
        }
    }

    /// One-shot visibility test, no polling. Errors count as "not visible".
    pub async fn is_visible_now(&self, selector: &str) -> bool {
        match self.execute(&visibility_probe(selector)).await {
            Ok(value) => value.as_bool().unwrap_or(false),
            Err(_) => false,
        }
    }

    pub async fn wait_for_visible(&self, selector: &str, timeout_ms: u64) -> Result<bool> {
        let tab = self.tab()?;
        NavigationManager::wait_for_visible(
            self.browser.as_ref(),
            tab,
            selector,
            timeout_ms,
            self.config.session.poll_interval_ms,
        )
        .await
    }

    pub async fn wait_for_attached(&self, selector: &str, timeout_ms: u64) -> Result<bool> {
        let tab = self.tab()?;
        NavigationManager::wait_for_attached(
            self.browser.as_ref(),
            tab,
            selector,
            timeout_ms,
            self.config.session.poll_interval_ms,
        )
        .await
    }

    /// Wait until no element matching the selector is visible any more.
    pub async fn wait_for_hidden(&self, selector: &str, timeout_ms: u64) -> Result<bool> {
        let tab = self.tab()?;
        let condition = format!("!({})", visibility_probe(selector).trim());
        NavigationManager::wait_for_condition(
            self.browser.as_ref(),
            tab,
            &condition,
            timeout_ms,
            self.config.session.poll_interval_ms,
        )
        .await
    }

    /// Wait until the page body contains the given text.
    pub async fn wait_for_text(&self, needle: &str, timeout_ms: u64) -> Result<bool> {
        let tab = self.tab()?;
        let condition = format!(
            "document.body && document.body.innerText.includes('{}')",
            escape_text(needle)
        );
        NavigationManager::wait_for_condition(
            self.browser.as_ref(),
            tab,
            &condition,
            timeout_ms,
            self.config.session.poll_interval_ms,
        )
        .await
    }

    pub async fn page_html(&self) -> Result<String> {
        let result = self.execute("document.documentElement.outerHTML").await?;
        match result {
            Value::String(html) => Ok(html),
            _ => Err(SuiteError::JavaScriptFailed(
                "page HTML unavailable".to_string(),
            )),
        }
    }

    pub async fn body_text(&self) -> Result<String> {
        let result = self
            .execute("document.body ? document.body.innerText : ''")
            .await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    pub async fn screenshot_bytes(&self) -> Result<Vec<u8>> {
        let tab = self.tab()?;
        self.browser.take_screenshot(tab).await
    }

    /// Capture the current auth-relevant state of the active tab.
    pub async fn extract_state(&self, domain: &str) -> Result<SessionData> {
        let url = self.current_url().await?;

        let cookie_script = r#"
            (function() {
                return document.cookie.split(';').map(function(c) {
                    const idx = c.indexOf('=');
                    return {
                        name: c.slice(0, idx).trim(),
                        value: c.slice(idx + 1).trim()
                    };
                }).filter(function(c) { return c.name; });
            })()
        "#;
        let cookies: Vec<CookieData> = serde_json::from_value(self.execute(cookie_script).await?)?;

        let storage_script = r#"
            (function() {
                const out = {};
                for (let i = 0; i < localStorage.length; i++) {
                    const key = localStorage.key(i);
                    out[key] = localStorage.getItem(key);
                }
                return out;
            })()
        "#;
        let local_storage: HashMap<String, String> =
            serde_json::from_value(self.execute(storage_script).await?)?;

        let user_agent = self
            .execute("navigator.userAgent")
            .await?
            .as_str()
            .map(|s| s.to_string());

        info!(
            domain,
            cookies = cookies.len(),
            storage_items = local_storage.len(),
            "Extracted session state"
        );

        Ok(SessionData {
            session_id: self.session_id.clone(),
            domain: domain.to_string(),
            url,
            cookies,
            local_storage,
            user_agent,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Replay persisted auth state into the active tab and reload.
    pub async fn inject_state(&self, state: &SessionData) -> Result<()> {
        let current_url = self.current_url().await?;
        if !current_url.contains(&state.domain) {
            let domain_url = if state.domain.starts_with("http") {
                state.domain.clone()
            } else {
                format!("https://{}", state.domain)
            };
            self.navigate_and_wait(&domain_url).await?;
        }

        let cookie_script = format!(
            r#"
            (function() {{
                const cookies = {};
                let count = 0;
                for (const c of cookies) {{
                    document.cookie = c.name + '=' + c.value + '; path=/';
                    count++;
                }}
                return count;
            }})()
            "#,
            serde_json::to_string(&state.cookies)?
        );
        self.execute(&cookie_script).await?;

        let storage_script = format!(
            r#"
            (function() {{
                const storage = {};
                let count = 0;
                for (const [key, value] of Object.entries(storage)) {{
                    localStorage.setItem(key, value);
                    count++;
                }}
                return count;
            }})()
            "#,
            serde_json::to_string(&state.local_storage)?
        );
        self.execute(&storage_script).await?;

        self.execute("window.location.reload()").await?;
        let tab = self.tab()?;
        NavigationManager::wait_for_ready(
            self.browser.as_ref(),
            tab,
            self.config.session.navigation_timeout_ms,
            self.config.session.poll_interval_ms,
        )
        .await?;

        info!(
            domain = %state.domain,
            cookies = state.cookies.len(),
            "Injected session state"
        );
        Ok(())
    }

    pub async fn save_state(&self, state: &SessionData, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        tokio::fs::write(path, json).await?;
        info!(path = %path.display(), "Saved session state");
        Ok(())
    }

    pub async fn load_state(path: &Path) -> Result<SessionData> {
        let raw = tokio::fs::read_to_string(path).await?;
        let state = serde_json::from_str(&raw)
            .map_err(|e| SuiteError::SessionState(format!("{}: {}", path.display(), e)))?;
        Ok(state)
    }

    /// Load and inject persisted auth state if a state file exists.
    /// Returns whether state was restored.
    pub async fn try_restore_state(&self, path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        let state = Self::load_state(path).await?;
        self.navigate_and_wait(&self.config.suite.base_url).await?;
        self.inject_state(&state).await?;
        Ok(true)
    }

    pub async fn close(&mut self) -> Result<()> {
        if let Some(tab) = self.tab.take() {
            let _ = self.browser.close_tab(&tab).await;
        }
        if let Some(browser) = Arc::get_mut(&mut self.browser) {
            browser.close().await?;
        }
        Ok(())
    }
}

/// Escape arbitrary text for embedding in a single-quoted JS string.
fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_text_handles_quotes_and_backslashes() {
        assert_eq!(escape_text(r"it's a\b"), r"it\'s a\\b");
    }

    #[test]
    fn session_state_round_trips_through_json() {
        let state = SessionData {
            session_id: "s-1".to_string(),
            domain: "ebay.com".to_string(),
            url: "https://www.ebay.com".to_string(),
            cookies: vec![CookieData {
                name: "token".to_string(),
                value: "abc".to_string(),
            }],
            local_storage: HashMap::from([("k".to_string(), "v".to_string())]),
            user_agent: None,
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&state).unwrap();
        let back: SessionData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.domain, "ebay.com");
        assert_eq!(back.cookies.len(), 1);
        assert_eq!(back.local_storage.get("k").map(String::as_str), Some("v"));
    }
}
