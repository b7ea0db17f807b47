use crate::browser::BrowserSession;
use crate::core::BrowserTrait;
use crate::errors::{Result, SuiteError};
use crate::search::{find_price_in_text, parse_price};
use crate::selection::{SelectionStrategy, VariationOption};
use crate::utils::screenshot::ScreenshotManager;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

const SUMMARY_PANEL: &str = "#RightSummaryPanel";
const ATC_BUTTON: &str = "[data-testid='x-atc-action'] [data-testid='ux-call-to-action']";
const SUCCESS_TEXT: &str = "Added to cart";
const CLOSE_DIALOG: &str = "button[name='Close dialog'], [aria-label='Close dialog']";

const SUBTOTAL_SELECTORS: &[&str] = &[
    "[data-test-id='subtotal-value']",
    ".font-title-3",
    ".atc-subtotal span",
];

/// What happened to one item of the cart workflow. Failures stay scoped to
/// their item; siblings always get their turn.
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    pub url: String,
    pub added: bool,
    pub error: Option<String>,
    pub evidence: Option<PathBuf>,
}

/// Cart workflow: open each collected item, resolve its variation choices,
/// add it, and verify the confirmation before moving on.
pub struct CartPage<'a, B: BrowserTrait> {
    session: &'a mut BrowserSession<B>,
}

impl<'a, B: BrowserTrait> CartPage<'a, B> {
    pub fn new(session: &'a mut BrowserSession<B>) -> Self {
        Self { session }
    }

    /// Process every identifier sequentially, each in a fresh tab so one
    /// item's failure cannot corrupt the next one's state.
    pub async fn add_items(
        &mut self,
        urls: &[String],
        strategy: &dyn SelectionStrategy,
    ) -> Vec<ItemOutcome> {
        let mut outcomes = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            info!(item = index + 1, total = urls.len(), %url, "Adding item to cart");
            let outcome = match self.add_single(index, url, strategy).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(item = index + 1, %err, "Failed to add item");
                    ItemOutcome {
                        url: url.clone(),
                        added: false,
                        error: Some(err.to_string()),
                        evidence: self.capture_evidence(index, "error").await,
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn add_single(
        &mut self,
        index: usize,
        url: &str,
        strategy: &dyn SelectionStrategy,
    ) -> Result<ItemOutcome> {
        self.session.fresh_tab().await?;
        self.session.navigate_and_wait(url).await?;

        self.resolve_variations(strategy).await?;
        self.session.click(ATC_BUTTON).await?;

        let verify_timeout = self.session.config().session.verify_timeout_ms;
        let added = self.session.wait_for_text(SUCCESS_TEXT, verify_timeout).await?;

        let evidence = if added {
            info!(item = index + 1, "Confirmation text visible");
            self.capture_evidence(index, "added").await
        } else {
            warn!(item = index + 1, "Confirmation text never appeared");
            self.capture_evidence(index, "unconfirmed").await
        };

        self.dismiss_dialog().await;

        Ok(ItemOutcome {
            url: url.to_string(),
            added,
            error: if added {
                None
            } else {
                Some("add-to-cart confirmation not visible within the wait".to_string())
            },
            evidence,
        })
    }

    /// Open each required selection menu in turn and pick an enabled option
    /// via the injected strategy. Rounds are bounded; a menu with no valid
    /// option is closed and ends the loop.
    async fn resolve_variations(&mut self, strategy: &dyn SelectionStrategy) -> Result<()> {
        let rounds = self.session.config().session.variation_rounds;

        for _ in 0..rounds {
            let trigger = self.open_next_selection_menu().await?;
            let label = match trigger {
                Some(label) => label,
                None => break,
            };
            info!(%label, "Opened selection menu");

            let options = self.visible_options().await?;
            if options.is_empty() {
                warn!(%label, "No enabled options in menu, closing it");
                self.session.press_escape().await?;
                break;
            }

            match strategy.choose(&options) {
                Some(choice) => {
                    info!(option = %choice.label, "Selected variation option");
                    self.click_option(choice.index).await?;
                }
                None => {
                    self.session.press_escape().await?;
                    break;
                }
            }
        }
        Ok(())
    }

    /// Find and click the first visible "Select ..." trigger in the buy box.
    /// Returns its label, or `None` when every required choice is resolved.
    async fn open_next_selection_menu(&self) -> Result<Option<String>> {
        let script = format!(
            r#"
            (function() {{
                const panel = document.querySelector('{}') || document;
                const buttons = panel.querySelectorAll('button');
                for (const btn of buttons) {{
                    const text = (btn.textContent || '').trim();
                    if (btn.offsetParent !== null && /select/i.test(text)) {{
                        btn.click();
                        return {{ found: true, label: text }};
                    }}
                }}
                return {{ found: false }};
            }})()
            "#,
            SUMMARY_PANEL
        );

        let result = self.session.execute(&script).await?;
        if result
            .get("found")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            Ok(result
                .get("label")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Enabled, visible options of the currently open menu, in rendered
    /// order. Indices address the full option list so a later click can find
    /// the same node again.
    async fn visible_options(&self) -> Result<Vec<VariationOption>> {
        let element_timeout = self.session.config().session.element_timeout_ms;
        self.session
            .wait_for_visible("[role='option']", element_timeout)
            .await?;

        let script = r#"
            (function() {
                const options = [];
                document.querySelectorAll("[role='option']").forEach(function(el, i) {
                    const text = (el.textContent || '').trim();
                    const disabled = el.getAttribute('aria-disabled') === 'true';
                    const visible = el.offsetParent !== null;
                    if (text && visible && !disabled && !/select/i.test(text)) {
                        options.push({ index: i, label: text });
                    }
                });
                return options;
            })()
        "#;

        let value = self.session.execute(script).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn click_option(&self, index: usize) -> Result<()> {
        let script = format!(
            r#"
            (function() {{
                const options = document.querySelectorAll("[role='option']");
                const el = options[{}];
                if (!el) return false;
                el.click();
                return true;
            }})()
            "#,
            index
        );

        let clicked = self.session.execute(&script).await?;
        if !clicked.as_bool().unwrap_or(false) {
            return Err(SuiteError::ElementNotFound(format!(
                "variation option {}",
                index
            )));
        }

        // The menu closing is the signal the choice was taken.
        let element_timeout = self.session.config().session.element_timeout_ms;
        self.session
            .wait_for_hidden("[role='option']", element_timeout)
            .await?;
        Ok(())
    }

    /// Close the add-to-cart confirmation, falling back to Escape.
    async fn dismiss_dialog(&self) {
        if self.session.is_visible_now(CLOSE_DIALOG).await {
            if self.session.click(CLOSE_DIALOG).await.is_ok() {
                return;
            }
        }
        let _ = self.session.press_escape().await;
    }

    async fn capture_evidence(&self, index: usize, tag: &str) -> Option<PathBuf> {
        let dir = &self.session.config().suite.reports_dir;
        let path = dir.join(format!("item_{}_{}.png", index + 1, tag));
        match ScreenshotManager::save_to_file(self.session, &path).await {
            Ok(()) => Some(path),
            Err(err) => {
                warn!(%err, "Evidence screenshot failed");
                None
            }
        }
    }

    /// Read the cart subtotal, trying the known selectors in order and
    /// falling back to a currency scan over the page text.
    pub async fn subtotal(&mut self) -> Result<f64> {
        let cart_url = self.session.config().suite.cart_url.clone();
        self.session.navigate_and_wait(&cart_url).await?;

        for selector in SUBTOTAL_SELECTORS {
            if !self.session.is_visible_now(selector).await {
                continue;
            }
            if let Ok(text) = self.session.inner_text(selector).await {
                if let Some(value) = parse_price(&text) {
                    return Ok(value);
                }
            }
        }

        warn!("Selector-based subtotal read failed, scanning page text");
        let body = self.session.body_text().await?;
        find_price_in_text(&body)
            .ok_or_else(|| SuiteError::ElementNotFound("cart subtotal".to_string()))
    }
}
