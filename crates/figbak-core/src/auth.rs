//! Browser session establishment.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::constants::{
    EMAIL_INPUT, INVALID_INPUT_CLASS, LOGIN_URL, PASSWORD_INPUT, RECENT_FILES_URL, SUBMIT_BUTTON,
};
use crate::driver::PageDriver;
use crate::error::AuthorizationError;
use crate::navigation::NavigationGate;
use crate::session::{CapturedSession, CookieSet, Credentials};
use crate::store::CookieStore;

/// Establishes an authenticated session on a page, preferring cached
/// cookies and falling back to interactive credential submission.
///
/// The cookie-restore fast path avoids re-submitting credentials on every
/// run; the fallback guarantees forward progress once cached cookies have
/// expired, at the cost of one extra round trip.
pub struct AuthenticationManager<S: CookieStore> {
    credentials: Credentials,
    store: S,
    /// Session captured by a login earlier in the same run.
    memo: Option<CapturedSession>,
    gate: NavigationGate,
    interaction_delay: Duration,
    typing_delay: Duration,
}

impl<S: CookieStore> AuthenticationManager<S> {
    pub fn new(
        credentials: Credentials,
        store: S,
        interaction_delay: Duration,
        typing_delay: Duration,
    ) -> Self {
        Self {
            credentials,
            store,
            memo: None,
            gate: NavigationGate::default(),
            interaction_delay,
            typing_delay,
        }
    }

    /// The session captured by the most recent fresh login in this run.
    pub fn captured_session(&self) -> Option<&CapturedSession> {
        self.memo.as_ref()
    }

    /// Converge on an authenticated page or fail the run.
    pub async fn authenticate<P: PageDriver>(
        &mut self,
        page: &P,
    ) -> Result<(), AuthorizationError> {
        info!("Authenticating...");

        if self.is_authenticated(page).await? {
            info!("Already logged in");
            return Ok(());
        }

        if self.restore_session(page).await? {
            info!("Session restored from cached cookies");
            return Ok(());
        }

        self.submit_credentials(page).await?;
        self.gate.settle(page).await;

        let location = page.current_url().await?;
        if location.contains(RECENT_FILES_URL) {
            info!("Successfully logged in");
            self.capture_session(page).await;
            Ok(())
        } else if location.starts_with(LOGIN_URL) {
            let reason = self
                .scrape_form_error(page)
                .await
                .unwrap_or_else(|| "unknown error".to_string());
            Err(AuthorizationError::new(reason))
        } else {
            Err(AuthorizationError::new(format!(
                "Unexpectedly redirected to \"{}\"",
                location
            )))
        }
    }

    async fn is_authenticated<P: PageDriver>(&self, page: &P) -> Result<bool, AuthorizationError> {
        let location = page.current_url().await?;
        Ok(location.contains(RECENT_FILES_URL))
    }

    /// Try the cached-cookie fast path. `Ok(true)` means the page is now
    /// authenticated without any credential submission.
    async fn restore_session<P: PageDriver>(&mut self, page: &P) -> Result<bool, AuthorizationError> {
        debug!("Looking for cached cookies...");
        let cookies: Option<CookieSet> = match self.store.load().await {
            Some(cookies) => Some(cookies),
            None => self.memo.as_ref().map(|s| s.cookies.clone()),
        };
        let Some(cookies) = cookies else {
            debug!("No cached cookies found");
            return Ok(false);
        };

        debug!("Restoring {} cached cookies...", cookies.len());
        page.install_cookies(&cookies).await?;
        page.goto(RECENT_FILES_URL).await?;
        self.gate.settle(page).await;

        self.is_authenticated(page).await
    }

    async fn submit_credentials<P: PageDriver>(&self, page: &P) -> Result<(), AuthorizationError> {
        debug!("Navigating to the login page...");
        page.goto(LOGIN_URL).await?;
        self.gate.settle(page).await;

        debug!("Submitting the login form...");

        tokio::time::sleep(self.interaction_delay).await;
        page.click(EMAIL_INPUT).await?;
        tokio::time::sleep(self.interaction_delay).await;
        page.type_text(&self.credentials.email, self.typing_delay)
            .await?;

        tokio::time::sleep(self.interaction_delay).await;
        page.click(PASSWORD_INPUT).await?;
        tokio::time::sleep(self.interaction_delay).await;
        page.type_text(&self.credentials.password, self.typing_delay)
            .await?;

        tokio::time::sleep(self.interaction_delay).await;
        page.click(SUBMIT_BUTTON).await?;
        Ok(())
    }

    /// Write the live session through: memo for this run, store for the
    /// next. Only a complete, non-empty set is ever kept.
    async fn capture_session<P: PageDriver>(&mut self, page: &P) {
        match page.capture_cookies().await {
            Ok(cookies) if !cookies.is_empty() => {
                debug!("Caching {} cookies...", cookies.len());
                if let Err(e) = self.store.save(&cookies).await {
                    warn!("Failed to persist cookies: {}", e);
                }
                self.memo = Some(CapturedSession::now(cookies));
            }
            Ok(_) => warn!("Login produced no cookies to cache"),
            Err(e) => warn!("Failed to capture cookies: {}", e),
        }
    }

    /// Field-level validation state of the login form, if any.
    async fn scrape_form_error<P: PageDriver>(&self, page: &P) -> Option<String> {
        let marked_invalid =
            |class: Option<String>| class.is_some_and(|c| c.contains(INVALID_INPUT_CLASS));

        if marked_invalid(page.element_class(EMAIL_INPUT).await.ok()?) {
            return Some("Invalid email".to_string());
        }
        if marked_invalid(page.element_class(PASSWORD_INPUT).await.ok()?) {
            return Some("Invalid password".to_string());
        }
        None
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
