use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub browser: BrowserConfig,
    pub session: SessionConfig,
    pub suite: SuiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: Option<String>,
    pub disable_images: bool,
    pub args: Vec<String>,
}

/// Timing and retry knobs shared by all page objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub navigation_timeout_ms: u64,
    pub element_timeout_ms: u64,
    pub verify_timeout_ms: u64,
    pub login_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub variation_rounds: u32,
}

/// Endpoints and filesystem locations for a suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub base_url: String,
    pub cart_url: String,
    pub signin_url: String,
    pub storage_state_path: PathBuf,
    pub reports_dir: PathBuf,
}

impl SuiteConfig {
    /// Host of `base_url`, the key under which session state is persisted.
    pub fn domain(&self) -> String {
        url::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| self.base_url.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            disable_images: false,
            args: vec![
                "--start-maximized".to_string(),
                "--disable-blink-features=AutomationControlled".to_string(),
            ],
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: 15_000,
            element_timeout_ms: 5_000,
            verify_timeout_ms: 10_000,
            login_timeout_ms: 60_000,
            poll_interval_ms: 100,
            variation_rounds: 3,
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ebay.com".to_string(),
            cart_url: "https://cart.ebay.com".to_string(),
            signin_url: "https://www.ebay.com/signin".to_string(),
            storage_state_path: PathBuf::from("auth.json"),
            reports_dir: PathBuf::from("reports"),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}
