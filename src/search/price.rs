use once_cell::sync::Lazy;
use regex::Regex;

static NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("price pattern is valid"));

static CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d[\d,]*(?:\.\d{1,2})?").expect("currency pattern is valid"));

/// Parse a free-form price label like `"$1,200.50"` into a numeric value.
///
/// Grouping commas are stripped before matching and the first contiguous
/// decimal numeral wins. A label without any numeral ("Free", "") yields
/// `None`; callers treat that as "price unknown, skip", never as an error.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let matched = NUMERAL.find(&cleaned)?;
    matched.as_str().parse().ok()
}

/// Find the first dollar amount anywhere in a block of page text.
///
/// Last-resort fallback when no subtotal selector matches.
pub fn find_price_in_text(text: &str) -> Option<f64> {
    let matched = CURRENCY.find(text)?;
    parse_price(matched.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_decimal_prices() {
        assert_eq!(parse_price("$1,200.50"), Some(1200.50));
        assert_eq!(parse_price("US $89.99"), Some(89.99));
        assert_eq!(parse_price("1,000"), Some(1000.0));
    }

    #[test]
    fn takes_the_first_numeral_in_ranges() {
        assert_eq!(parse_price("$12.99 to $45.00"), Some(12.99));
    }

    #[test]
    fn labels_without_numerals_yield_none() {
        assert_eq!(parse_price("Free"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("Contact seller"), None);
    }

    #[test]
    fn parsing_is_idempotent_on_its_own_output() {
        let first = parse_price("$1,200.50").unwrap();
        assert_eq!(parse_price(&first.to_string()), Some(first));
    }

    #[test]
    fn finds_dollar_amounts_in_page_text() {
        assert_eq!(
            find_price_in_text("Subtotal (3 items)\n$1,234.56\nShipping"),
            Some(1234.56)
        );
        assert_eq!(find_price_in_text("no money here"), None);
    }
}
