use crate::browser::BrowserSession;
use crate::core::BrowserTrait;
use crate::errors::{Result, SuiteError};
use std::time::{Duration, Instant};
use tracing::info;

const USER_INPUT: &str = "#userid";
const PASS_INPUT: &str = "#pass";
const CONTINUE_BTN: &str = "#signin-continue-btn";
const SIGNIN_BTN: &str = "#sgnBt";

/// Scripted sign-in. On success the session's auth state is persisted so
/// later runs skip this page entirely.
pub struct LoginPage<'a, B: BrowserTrait> {
    session: &'a mut BrowserSession<B>,
}

impl<'a, B: BrowserTrait> LoginPage<'a, B> {
    pub fn new(session: &'a mut BrowserSession<B>) -> Self {
        Self { session }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let signin_url = self.session.config().suite.signin_url.clone();
        self.session.navigate_and_wait(&signin_url).await?;

        self.session.fill(USER_INPUT, username).await?;
        self.session.click(CONTINUE_BTN).await?;

        let element_timeout = self.session.config().session.element_timeout_ms;
        if !self
            .session
            .wait_for_visible(PASS_INPUT, element_timeout)
            .await?
        {
            return Err(SuiteError::ElementNotFound(PASS_INPUT.to_string()));
        }

        self.session.fill(PASS_INPUT, password).await?;
        self.session.click(SIGNIN_BTN).await?;

        self.wait_for_signed_in_redirect().await?;

        let domain = self.session.config().suite.domain();
        let state_path = self.session.config().suite.storage_state_path.clone();
        let state = self.session.extract_state(&domain).await?;
        self.session.save_state(&state, &state_path).await?;

        info!(%domain, "Signed in and persisted session state");
        Ok(())
    }

    /// Sign-in is done once the browser lands back on the storefront.
    async fn wait_for_signed_in_redirect(&self) -> Result<()> {
        let base_url = self.session.config().suite.base_url.clone();
        let timeout = Duration::from_millis(self.session.config().session.login_timeout_ms);
        let poll = Duration::from_millis(self.session.config().session.poll_interval_ms);
        let start = Instant::now();

        while start.elapsed() < timeout {
            let url = self.session.current_url().await?;
            if url.starts_with(&base_url) && !url.contains("signin") {
                return Ok(());
            }
            tokio::time::sleep(poll).await;
        }

        Err(SuiteError::Timeout(
            "sign-in redirect never completed".to_string(),
        ))
    }
}
