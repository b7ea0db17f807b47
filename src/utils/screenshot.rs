use crate::browser::BrowserSession;
use crate::core::BrowserTrait;
use crate::errors::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Evidence capture for reports: screenshots as files next to the run
/// report, or base64 for embedding inside it.
pub struct ScreenshotManager;

impl ScreenshotManager {
    pub async fn take_base64<B: BrowserTrait>(session: &BrowserSession<B>) -> Result<String> {
        let bytes = session.screenshot_bytes().await?;
        Ok(STANDARD.encode(bytes))
    }

    pub async fn save_to_file<B: BrowserTrait>(
        session: &BrowserSession<B>,
        path: &Path,
    ) -> Result<()> {
        let bytes = session.screenshot_bytes().await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}
