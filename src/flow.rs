//! The end-to-end scenario: search, collect under the budget ceiling, add to
//! cart, read the subtotal. The budget comparison itself belongs to the
//! caller; this module only gathers the numbers into a report.

use crate::browser::BrowserSession;
use crate::core::BrowserTrait;
use crate::errors::Result;
use crate::pages::{CartPage, ItemOutcome, SearchPage};
use crate::search::{collect, SearchRequest};
use crate::selection::SelectionStrategy;
use crate::types::TestRecord;
use crate::utils::ScreenshotManager;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct FlowReport {
    pub query: String,
    pub price_ceiling: f64,
    pub requested: usize,
    pub collected: Vec<String>,
    pub outcomes: Vec<ItemOutcome>,
    pub subtotal: Option<f64>,
    pub threshold: f64,
    pub cart_screenshot_base64: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl FlowReport {
    /// A run that found nothing to buy; the cart workflow was skipped and
    /// there is no budget to evaluate.
    pub fn skipped(&self) -> bool {
        self.collected.is_empty()
    }

    /// `Some(true)` when the cart subtotal stayed within ceiling × items.
    /// `None` when the subtotal could not be read.
    pub fn within_budget(&self) -> Option<bool> {
        self.subtotal.map(|subtotal| subtotal <= self.threshold)
    }
}

/// Run one scenario record end to end against a live session.
pub async fn run_budget_flow<B: BrowserTrait>(
    session: &mut BrowserSession<B>,
    record: &TestRecord,
    strategy: &dyn SelectionStrategy,
) -> Result<FlowReport> {
    let started_at = Utc::now();
    let request = SearchRequest {
        query: record.item_name.clone(),
        price_ceiling: record.max_price,
        desired_count: record.limit,
    };
    info!(
        query = %request.query,
        ceiling = request.price_ceiling,
        limit = request.desired_count,
        "Starting budget flow"
    );

    let base_url = session.config().suite.base_url.clone();
    session.navigate_and_wait(&base_url).await?;

    let collected = {
        let mut search = SearchPage::new(session);
        search.submit_search(&request.query).await?;
        search.apply_price_filter(request.price_ceiling).await?;
        collect(&mut search, &request).await?
    };

    if collected.is_empty() {
        warn!(query = %request.query, "No qualifying items found, skipping cart workflow");
        return Ok(FlowReport {
            query: request.query,
            price_ceiling: request.price_ceiling,
            requested: request.desired_count,
            collected,
            outcomes: Vec::new(),
            subtotal: None,
            threshold: 0.0,
            cart_screenshot_base64: None,
            started_at,
            finished_at: Utc::now(),
        });
    }

    let threshold = record.max_price * collected.len() as f64;

    let mut cart = CartPage::new(session);
    let outcomes = cart.add_items(&collected, strategy).await;
    let subtotal = match cart.subtotal().await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(%err, "Cart subtotal could not be read");
            None
        }
    };

    let cart_screenshot_base64 = ScreenshotManager::take_base64(session).await.ok();

    Ok(FlowReport {
        query: request.query,
        price_ceiling: request.price_ceiling,
        requested: request.desired_count,
        collected,
        outcomes,
        subtotal,
        threshold,
        cart_screenshot_base64,
        started_at,
        finished_at: Utc::now(),
    })
}

/// Write the report next to the evidence screenshots and return its path.
pub fn write_report(report: &FlowReport, reports_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(reports_dir)?;
    let slug: String = report
        .query
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let path = reports_dir.join(format!(
        "report_{}_{}.json",
        slug,
        report.finished_at.format("%Y%m%dT%H%M%S")
    ));
    std::fs::write(&path, serde_json::to_string_pretty(report)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report() -> FlowReport {
        FlowReport {
            query: "gpu".to_string(),
            price_ceiling: 100.0,
            requested: 5,
            collected: Vec::new(),
            outcomes: Vec::new(),
            subtotal: None,
            threshold: 0.0,
            cart_screenshot_base64: None,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn empty_collection_reads_as_skipped() {
        let report = empty_report();
        assert!(report.skipped());
        assert_eq!(report.within_budget(), None);
    }

    #[test]
    fn budget_verdict_compares_subtotal_to_threshold() {
        let mut report = empty_report();
        report.collected = vec!["https://www.ebay.com/itm/1".to_string()];
        report.threshold = 100.0;

        report.subtotal = Some(99.99);
        assert_eq!(report.within_budget(), Some(true));

        report.subtotal = Some(100.01);
        assert_eq!(report.within_budget(), Some(false));
    }

    #[test]
    fn report_filenames_are_query_slugged() {
        let dir = tempfile::tempdir().unwrap();
        let report = empty_report();
        let path = write_report(&report, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("report_gpu_"));
        assert!(name.ends_with(".json"));
    }
}
