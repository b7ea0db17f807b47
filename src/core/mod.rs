pub mod browser;
pub mod config;
pub mod listing;

pub use browser::BrowserTrait;
pub use config::{BrowserConfig, Config, SessionConfig, SuiteConfig, Viewport};
pub use listing::{ListingEntry, ListingSource};
