//! Capability traits for the browser automation driver.
//!
//! Every component receives page and browser handles through these traits,
//! never through ambient globals. Production wires in the CDP driver; the
//! state-machine tests substitute a scripted fake.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverError;
use crate::session::CookieSet;

/// One isolated browser page/tab.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait for the document to load.
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    /// Wait for the next navigation to commit, or time out.
    async fn wait_for_navigation(&self, timeout: Duration) -> Result<(), DriverError>;

    async fn wait_for_selector(&self, selector: &str, timeout: Duration)
    -> Result<(), DriverError>;

    async fn selector_present(&self, selector: &str) -> Result<bool, DriverError>;

    /// The `class` attribute of the first element matching `selector`,
    /// `None` when no such element exists.
    async fn element_class(&self, selector: &str) -> Result<Option<String>, DriverError>;

    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    /// Type into the focused element, one keystroke per `delay`.
    async fn type_text(&self, text: &str, delay: Duration) -> Result<(), DriverError>;

    async fn press_key(&self, key: &str) -> Result<(), DriverError>;

    /// Press `key` while holding `modifier` (e.g. "Control" + "p").
    async fn key_chord(&self, modifier: &str, key: &str) -> Result<(), DriverError>;

    /// Install a cookie set into the page's cookie jar.
    async fn install_cookies(&self, cookies: &CookieSet) -> Result<(), DriverError>;

    /// The page's current cookie jar contents.
    async fn capture_cookies(&self) -> Result<CookieSet, DriverError>;

    /// Point the page's download sink at `dir`.
    async fn set_download_dir(&self, dir: &Path) -> Result<(), DriverError>;

    /// Resolve once no request has been in flight for `quiet`, or fail once
    /// `timeout` expires.
    async fn wait_for_network_idle(
        &self,
        quiet: Duration,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    async fn close(&self) -> Result<(), DriverError>;
}

/// A browser instance owning one authenticated cookie jar shared by all of
/// its pages.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    type Page: PageDriver + 'static;

    /// Launch (or connect to) the browser. Idempotent.
    async fn launch(&self) -> Result<(), DriverError>;

    /// The page the browser opened on startup.
    async fn initial_page(&self) -> Result<Self::Page, DriverError>;

    /// Open a fresh, isolated page.
    async fn open_page(&self) -> Result<Self::Page, DriverError>;

    /// Tear the browser down, including any process launched for this run.
    async fn close(&self) -> Result<(), DriverError>;
}
