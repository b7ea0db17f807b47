use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Browser not launched")]
    BrowserNotLaunched,

    #[error("Tab creation failed: {0}")]
    TabCreationFailed(String),

    #[error("No active tab")]
    NoActiveTab,

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("Search setup failed for '{query}' at {url}: {reason}")]
    SearchSetupFailed {
        query: String,
        url: String,
        reason: String,
    },

    #[error("Session state error: {0}")]
    SessionState(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Test data error: {0}")]
    TestData(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chrome error: {0}")]
    Chrome(String),
}

pub type Result<T> = std::result::Result<T, SuiteError>;

// headless_chrome surfaces its failures as anyhow errors
impl From<anyhow::Error> for SuiteError {
    fn from(err: anyhow::Error) -> Self {
        SuiteError::Chrome(err.to_string())
    }
}
