use crate::core::ListingEntry;
use crate::search::price::parse_price;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Listing rows as the marketplace renders them.
const ITEM_SELECTOR: &str = "li[id^='item'], li.s-item";
const PRICE_SELECTOR: &str = "[class*='price']";
const LINK_SELECTOR: &str = "a[class*='link'], a[href]";

/// Marker distinguishing product links from ads and category navigation.
const PRODUCT_PATH_MARKER: &str = "itm";

/// Build a listing snapshot from raw page HTML.
///
/// Each row's price label and link are read best-effort; rows missing either
/// stay in the snapshot with `None` fields so the extractor can account for
/// them in rendered order.
pub fn parse_listing(html: &str) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);
    let mut entries = Vec::new();

    let item_selector = match Selector::parse(ITEM_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return entries,
    };

    for item in document.select(&item_selector) {
        entries.push(ListingEntry {
            href: first_attr(item, LINK_SELECTOR, "href"),
            price_text: first_text(item, PRICE_SELECTOR),
        });
    }

    entries
}

fn first_text(item: ElementRef<'_>, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    let element = item.select(&selector).next()?;
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn first_attr(item: ElementRef<'_>, selector_str: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    item.select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.to_string())
}

/// Filter a listing snapshot down to qualifying item identifiers.
///
/// Rendered order is preserved, so when capacity runs out the first-seen
/// entries win. An entry qualifies when its price label parses to a value at
/// or below the ceiling AND its link is a well-formed product reference.
/// Everything else is silently skipped; that is the filter predicate, not an
/// error path. Stops as soon as `remaining_capacity` identifiers are taken.
pub fn extract_matching(
    entries: &[ListingEntry],
    price_ceiling: f64,
    remaining_capacity: usize,
) -> Vec<String> {
    let mut found = Vec::new();

    for entry in entries {
        if found.len() >= remaining_capacity {
            break;
        }

        let price = entry.price_text.as_deref().and_then(parse_price);
        let qualifies = match price {
            Some(value) => value <= price_ceiling,
            None => false,
        };
        if !qualifies {
            continue;
        }

        if let Some(href) = entry.href.as_deref() {
            if is_product_href(href) {
                found.push(href.to_string());
            }
        }
    }

    found
}

/// A well-formed identifier is a non-empty absolute URL whose path looks
/// like a product page rather than an ad or category link.
fn is_product_href(href: &str) -> bool {
    if href.is_empty() {
        return false;
    }
    match Url::parse(href) {
        Ok(url) => url.path().contains(PRODUCT_PATH_MARKER),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(price: Option<&str>, href: Option<&str>) -> ListingEntry {
        ListingEntry {
            href: href.map(String::from),
            price_text: price.map(String::from),
        }
    }

    fn product(n: u32) -> String {
        format!("https://www.ebay.com/itm/{}", n)
    }

    #[test]
    fn keeps_entries_at_or_below_the_ceiling_in_rendered_order() {
        let entries = vec![
            entry(Some("$10.00"), Some(&product(1))),
            entry(Some("$99.99"), Some(&product(2))),
            entry(Some("$50.00"), Some(&product(3))),
        ];

        let found = extract_matching(&entries, 50.0, 10);
        assert_eq!(found, vec![product(1), product(3)]);
    }

    #[test]
    fn never_exceeds_remaining_capacity() {
        let entries: Vec<_> = (0..10)
            .map(|n| entry(Some("$5.00"), Some(&product(n))))
            .collect();

        assert_eq!(extract_matching(&entries, 10.0, 3).len(), 3);
        assert!(extract_matching(&entries, 10.0, 0).is_empty());
    }

    #[test]
    fn skips_unparseable_prices_and_malformed_links() {
        let entries = vec![
            entry(Some("Free"), Some(&product(1))),
            entry(None, Some(&product(2))),
            entry(Some("$5.00"), None),
            entry(Some("$5.00"), Some("")),
            entry(Some("$5.00"), Some("itm/relative")),
            entry(Some("$5.00"), Some("https://www.ebay.com/b/category")),
            entry(Some("$5.00"), Some(&product(7))),
        ];

        assert_eq!(extract_matching(&entries, 10.0, 10), vec![product(7)]);
    }

    #[test]
    fn parses_rows_from_listing_html() {
        let html = r#"
            <html><body><ul class="srp-results">
              <li class="s-item">
                <a class="s-item__link" href="https://www.ebay.com/itm/111">Item one</a>
                <span class="s-item__price">$12.50</span>
              </li>
              <li class="s-item">
                <a class="s-item__link" href="https://www.ebay.com/itm/222">Item two</a>
                <span class="s-item__price">Free</span>
              </li>
              <li class="s-item">
                <span>No link, no price</span>
              </li>
            </ul></body></html>
        "#;

        let entries = parse_listing(html);
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0].href.as_deref(),
            Some("https://www.ebay.com/itm/111")
        );
        assert_eq!(entries[0].price_text.as_deref(), Some("$12.50"));
        assert_eq!(entries[1].price_text.as_deref(), Some("Free"));
        assert_eq!(entries[2].href, None);
        assert_eq!(entries[2].price_text, None);
    }

    #[test]
    fn snapshot_feeds_straight_into_extraction() {
        let html = r#"
            <ul>
              <li class="s-item">
                <a class="link" href="https://www.ebay.com/itm/1">a</a>
                <span class="price">$9.99</span>
              </li>
              <li class="s-item">
                <a class="link" href="https://www.ebay.com/itm/2">b</a>
                <span class="price">$99.99</span>
              </li>
            </ul>
        "#;

        let found = extract_matching(&parse_listing(html), 20.0, 5);
        assert_eq!(found, vec!["https://www.ebay.com/itm/1".to_string()]);
    }
}
