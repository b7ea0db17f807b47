use crate::errors::Result;
use async_trait::async_trait;

/// One product row as rendered on a results listing.
///
/// Both fields are best-effort reads; a row without a price label or link is
/// normal and gets filtered out downstream, never treated as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingEntry {
    pub href: Option<String>,
    pub price_text: Option<String>,
}

/// Abstract view of "the current listing page".
///
/// The collector only ever reads entry snapshots and moves forward, so a
/// stubbed implementation backed by vectors is enough to test the whole
/// collection algorithm without a browser.
#[async_trait]
pub trait ListingSource {
    /// Snapshot of the entries on the current page, in rendered order.
    async fn entries(&mut self) -> Result<Vec<ListingEntry>>;

    /// Advance to the next listing page.
    ///
    /// Returns `Ok(false)` when no next-page affordance is present; the page
    /// cursor is only ever moved forward, never rolled back.
    async fn advance(&mut self) -> Result<bool>;
}
