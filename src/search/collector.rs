use crate::core::ListingSource;
use crate::errors::Result;
use crate::search::extract::extract_matching;
use tracing::info;

/// Immutable input for one collection run.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub price_ceiling: f64,
    pub desired_count: usize,
}

/// Collect up to `desired_count` qualifying item identifiers, paging forward
/// until the quantity is reached or the listing runs out.
///
/// The result grows append-only and never exceeds `desired_count`; duplicates
/// across pages are kept as the listing presents them. Exhaustion yields a
/// partial (possibly empty) result, which is a normal outcome. Only a failed
/// page read propagates, because the request cannot continue without one.
pub async fn collect<S: ListingSource + ?Sized>(
    source: &mut S,
    request: &SearchRequest,
) -> Result<Vec<String>> {
    let mut found: Vec<String> = Vec::new();

    loop {
        let remaining = request.desired_count - found.len();
        let entries = source.entries().await?;
        let matched = extract_matching(&entries, request.price_ceiling, remaining);
        found.extend(matched);

        if found.len() >= request.desired_count {
            break;
        }
        if !source.advance().await? {
            break;
        }
    }

    info!(
        query = %request.query,
        found = found.len(),
        requested = request.desired_count,
        "Search collection finished"
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SuiteError;
    use crate::testing::{priced_entries, ScriptedListing, UnreadyListing};

    fn request(ceiling: f64, count: usize) -> SearchRequest {
        SearchRequest {
            query: "graphics card".to_string(),
            price_ceiling: ceiling,
            desired_count: count,
        }
    }

    #[tokio::test]
    async fn stops_at_desired_count_without_touching_the_next_page() {
        // 7 qualifying entries across 2 pages (5 then 2), desired 5
        let mut source = ScriptedListing::new(vec![
            priced_entries(5.0, &[0, 1, 2, 3, 4]),
            priced_entries(5.0, &[5, 6]),
        ]);

        let found = collect(&mut source, &request(10.0, 5)).await.unwrap();

        assert_eq!(found.len(), 5);
        assert_eq!(source.advances, 0, "page 2 must never be visited");
        assert!(found[0].ends_with("/itm/0") && found[4].ends_with("/itm/4"));
    }

    #[tokio::test]
    async fn exhaustion_yields_the_smaller_partial_result() {
        // 3 qualifying entries total, desired 10
        let mut source = ScriptedListing::new(vec![
            priced_entries(5.0, &[0, 1]),
            priced_entries(5.0, &[2]),
        ]);

        let found = collect(&mut source, &request(10.0, 10)).await.unwrap();

        assert_eq!(found.len(), 3);
        assert_eq!(source.advances, 1);
    }

    #[tokio::test]
    async fn nothing_under_the_ceiling_is_a_benign_empty_result() {
        let mut source = ScriptedListing::new(vec![
            priced_entries(500.0, &[0, 1]),
            priced_entries(750.0, &[2]),
        ]);

        let found = collect(&mut source, &request(10.0, 4)).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn result_is_capped_by_desired_count_on_a_single_page() {
        let mut source =
            ScriptedListing::new(vec![priced_entries(1.0, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9])]);

        let found = collect(&mut source, &request(10.0, 4)).await.unwrap();
        assert_eq!(found.len(), 4);
    }

    #[tokio::test]
    async fn growth_is_monotonic_across_pages() {
        let mut source = ScriptedListing::new(vec![
            priced_entries(2.0, &[0]),
            priced_entries(2.0, &[1]),
            priced_entries(2.0, &[2]),
        ]);

        let found = collect(&mut source, &request(10.0, 3)).await.unwrap();
        // Append-only: page order is preserved, nothing removed or reordered.
        assert!(found[0].ends_with("/itm/0"));
        assert!(found[1].ends_with("/itm/1"));
        assert!(found[2].ends_with("/itm/2"));
    }

    #[tokio::test]
    async fn a_failed_page_read_propagates() {
        let mut source = UnreadyListing;
        let err = collect(&mut source, &request(10.0, 2)).await.unwrap_err();
        assert!(matches!(err, SuiteError::SearchSetupFailed { .. }));
    }
}
