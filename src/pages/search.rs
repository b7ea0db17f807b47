use crate::browser::BrowserSession;
use crate::core::{BrowserTrait, ListingEntry, ListingSource};
use crate::errors::{Result, SuiteError};
use crate::search::parse_listing;
use async_trait::async_trait;
use tracing::{info, warn};

const SEARCH_INPUT: &str = "input[name='_nkw']";
const SEARCH_SUBMIT: &str = "#gh-btn, input[type='submit']";
const RESULTS_CONTAINER: &str = ".srp-results";
const RESULTS_LIST: &str = "ul[class*='results']";
const MAX_PRICE_INPUT: &str = "input[id*='endParamValue']";
const NEXT_PAGE: &str = "a.pagination__next, a[aria-label='Go to next search page']";

/// The search results page. Submitting a query is the one fatal step of a
/// run: without a rendered first page there is nothing to collect from.
pub struct SearchPage<'a, B: BrowserTrait> {
    session: &'a mut BrowserSession<B>,
}

impl<'a, B: BrowserTrait> SearchPage<'a, B> {
    pub fn new(session: &'a mut BrowserSession<B>) -> Self {
        Self { session }
    }

    /// Type the query, submit, and wait for the results container.
    ///
    /// The listing never becoming visible is unrecoverable for the whole
    /// request and propagates with the query and page attached.
    pub async fn submit_search(&mut self, query: &str) -> Result<()> {
        info!(%query, "Submitting search");
        self.session.fill(SEARCH_INPUT, query).await?;
        self.session.click(SEARCH_SUBMIT).await?;

        let timeout = self.session.config().session.navigation_timeout_ms;
        if !self
            .session
            .wait_for_visible(RESULTS_CONTAINER, timeout)
            .await?
        {
            let url = self.session.current_url().await.unwrap_or_default();
            return Err(SuiteError::SearchSetupFailed {
                query: query.to_string(),
                url,
                reason: "results container never became visible".to_string(),
            });
        }
        Ok(())
    }

    /// Apply the marketplace's own maximum-price filter when the sidebar
    /// input is present. Best-effort: per-entry filtering covers the case
    /// where it is missing, so absence only warrants a warning.
    pub async fn apply_price_filter(&mut self, max_price: f64) -> Result<()> {
        let element_timeout = self.session.config().session.element_timeout_ms;
        if !self
            .session
            .wait_for_visible(MAX_PRICE_INPUT, element_timeout)
            .await?
        {
            warn!("Price filter input not found, relying on per-entry filtering");
            return Ok(());
        }

        info!(max_price, "Applying price filter");
        self.session
            .fill(MAX_PRICE_INPUT, &max_price.to_string())
            .await?;
        self.session.press_key(MAX_PRICE_INPUT, "Enter").await?;

        let nav_timeout = self.session.config().session.navigation_timeout_ms;
        if !self
            .session
            .wait_for_attached(RESULTS_LIST, nav_timeout)
            .await?
        {
            warn!("Results list did not re-attach after the price filter");
        }
        Ok(())
    }
}

#[async_trait]
impl<'a, B: BrowserTrait> ListingSource for SearchPage<'a, B> {
    async fn entries(&mut self) -> Result<Vec<ListingEntry>> {
        let html = self.session.page_html().await?;
        Ok(parse_listing(&html))
    }

    async fn advance(&mut self) -> Result<bool> {
        // Existence of the affordance is a single visibility test.
        if !self.session.is_visible_now(NEXT_PAGE).await {
            return Ok(false);
        }

        info!("Navigating to the next results page");
        self.session.click(NEXT_PAGE).await?;

        let timeout = self.session.config().session.navigation_timeout_ms;
        if !self
            .session
            .wait_for_attached(RESULTS_LIST, timeout)
            .await?
        {
            return Err(SuiteError::NavigationFailed(
                "results list missing after pagination".to_string(),
            ));
        }
        Ok(true)
    }
}
