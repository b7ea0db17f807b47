pub mod collector;
pub mod extract;
pub mod price;

pub use collector::{collect, SearchRequest};
pub use extract::{extract_matching, parse_listing};
pub use price::{find_price_in_text, parse_price};
