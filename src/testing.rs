//! In-memory listing fakes used by the collector tests and available to
//! downstream suites that want to exercise flows without a browser.

use crate::core::{ListingEntry, ListingSource};
use crate::errors::{Result, SuiteError};
use async_trait::async_trait;

/// A listing whose pages are scripted up front. `advance` walks the page
/// vector forward and counts how often it was asked to.
pub struct ScriptedListing {
    pages: Vec<Vec<ListingEntry>>,
    current: usize,
    pub advances: usize,
}

impl ScriptedListing {
    pub fn new(pages: Vec<Vec<ListingEntry>>) -> Self {
        Self {
            pages,
            current: 0,
            advances: 0,
        }
    }
}

#[async_trait]
impl ListingSource for ScriptedListing {
    async fn entries(&mut self) -> Result<Vec<ListingEntry>> {
        Ok(self.pages.get(self.current).cloned().unwrap_or_default())
    }

    async fn advance(&mut self) -> Result<bool> {
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            self.advances += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// A listing whose first page never renders: every read fails the way a dead
/// search results page does.
pub struct UnreadyListing;

#[async_trait]
impl ListingSource for UnreadyListing {
    async fn entries(&mut self) -> Result<Vec<ListingEntry>> {
        Err(SuiteError::SearchSetupFailed {
            query: "scripted".to_string(),
            url: "about:blank".to_string(),
            reason: "listing container never rendered".to_string(),
        })
    }

    async fn advance(&mut self) -> Result<bool> {
        Ok(false)
    }
}

/// Build a page of uniformly priced product entries, one per id.
pub fn priced_entries(price: f64, ids: &[u32]) -> Vec<ListingEntry> {
    ids.iter()
        .map(|id| ListingEntry {
            href: Some(format!("https://www.ebay.com/itm/{}", id)),
            price_text: Some(format!("${:.2}", price)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_listing_pages_forward_and_stops() {
        tokio_test::block_on(async {
            let mut listing = ScriptedListing::new(vec![
                priced_entries(1.0, &[1]),
                priced_entries(2.0, &[2]),
            ]);

            assert_eq!(listing.entries().await.unwrap().len(), 1);
            assert!(listing.advance().await.unwrap());
            assert_eq!(
                listing.entries().await.unwrap()[0].price_text.as_deref(),
                Some("$2.00")
            );
            assert!(!listing.advance().await.unwrap());
            assert_eq!(listing.advances, 1);
        });
    }
}
