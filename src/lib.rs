pub mod browser;
pub mod core;
pub mod errors;
pub mod flow;
pub mod pages;
pub mod search;
pub mod selection;
pub mod testing;
pub mod types;
pub mod utils;

pub use browser::{BrowserSession, ChromeBrowser, SessionData};
pub use core::{BrowserTrait, Config, ListingEntry, ListingSource};
pub use errors::{Result, SuiteError};
pub use flow::{run_budget_flow, FlowReport};
pub use search::{collect, parse_price, SearchRequest};
pub use selection::{FirstChoice, RandomChoice, SelectionStrategy};
pub use types::{load_test_data, TestRecord};
