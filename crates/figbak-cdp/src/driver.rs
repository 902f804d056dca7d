//! figbak-core driver implementation backed by the CDP client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Child;
use tokio::sync::RwLock;
use tracing::info;

use figbak_core::driver::{BrowserDriver, PageDriver};
use figbak_core::error::DriverError;
use figbak_core::session::CookieSet;

use crate::chrome;
use crate::client::CdpClient;
use crate::session::PageSession;

/// Browser configuration.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Chrome debugging port.
    pub debug_port: u16,
    /// Whether to run Chrome without a visible window.
    pub headless: bool,
    /// Profile directory; isolates the bot's session from the user's own
    /// browser.
    pub profile_dir: PathBuf,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            headless: true,
            profile_dir: PathBuf::from(figbak_core::constants::ROOT_DIR).join("browser-profile"),
        }
    }
}

impl BrowserConfig {
    /// The CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }
}

/// A Chrome instance driven over CDP.
pub struct CdpBrowser {
    config: BrowserConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    /// Chrome process handle (if we launched it).
    chrome_process: RwLock<Option<Child>>,
}

impl CdpBrowser {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            chrome_process: RwLock::new(None),
        }
    }

    async fn client(&self) -> Result<Arc<CdpClient>, DriverError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(DriverError::NotConnected)
    }
}

#[async_trait]
impl BrowserDriver for CdpBrowser {
    type Page = CdpPage;

    async fn launch(&self) -> Result<(), DriverError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        let endpoint = self.config.endpoint();
        if !chrome::is_running(&endpoint).await {
            info!("Launching browser on port {}", self.config.debug_port);
            let child = chrome::launch(&self.config).await.map_err(DriverError::from)?;
            *self.chrome_process.write().await = Some(child);
            chrome::wait_until_up(&endpoint).await?;
        } else {
            info!("Reusing browser already running on port {}", self.config.debug_port);
        }

        let client = CdpClient::connect(&endpoint).await?;
        *self.client.write().await = Some(Arc::new(client));
        Ok(())
    }

    async fn initial_page(&self) -> Result<CdpPage, DriverError> {
        let client = self.client().await?;
        let session = client.first_page().await?;
        Ok(CdpPage {
            session: Arc::new(session),
        })
    }

    async fn open_page(&self) -> Result<CdpPage, DriverError> {
        let client = self.client().await?;
        let session = client.new_page().await?;
        Ok(CdpPage {
            session: Arc::new(session),
        })
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.client.write().await.take();
        if let Some(mut child) = self.chrome_process.write().await.take() {
            info!("Shutting down the browser");
            let _ = child.kill().await;
        }
        Ok(())
    }
}

/// One browser page, adapted to the core's capability trait.
pub struct CdpPage {
    session: Arc<PageSession>,
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        Ok(self.session.navigate(url).await?)
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.session.current_url().await?)
    }

    async fn wait_for_navigation(&self, timeout: std::time::Duration) -> Result<(), DriverError> {
        Ok(self.session.wait_for_navigation(timeout).await?)
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: std::time::Duration,
    ) -> Result<(), DriverError> {
        self.session.wait_for_selector(selector, timeout).await?;
        Ok(())
    }

    async fn selector_present(&self, selector: &str) -> Result<bool, DriverError> {
        Ok(self.session.selector_present(selector).await?)
    }

    async fn element_class(&self, selector: &str) -> Result<Option<String>, DriverError> {
        Ok(self.session.element_class(selector).await?)
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        Ok(self.session.click_selector(selector).await?)
    }

    async fn type_text(&self, text: &str, delay: std::time::Duration) -> Result<(), DriverError> {
        Ok(self.session.type_text(text, delay).await?)
    }

    async fn press_key(&self, key: &str) -> Result<(), DriverError> {
        Ok(self.session.press_key(key).await?)
    }

    async fn key_chord(&self, modifier: &str, key: &str) -> Result<(), DriverError> {
        Ok(self.session.key_chord(modifier, key).await?)
    }

    async fn install_cookies(&self, cookies: &CookieSet) -> Result<(), DriverError> {
        Ok(self.session.set_cookies(cookies).await?)
    }

    async fn capture_cookies(&self) -> Result<CookieSet, DriverError> {
        Ok(self.session.get_cookies().await?)
    }

    async fn set_download_dir(&self, dir: &Path) -> Result<(), DriverError> {
        Ok(self.session.set_download_behavior(dir).await?)
    }

    async fn wait_for_network_idle(
        &self,
        quiet: std::time::Duration,
        timeout: std::time::Duration,
    ) -> Result<(), DriverError> {
        Ok(self.session.wait_for_network_idle(quiet, timeout).await?)
    }

    async fn close(&self) -> Result<(), DriverError> {
        Ok(self.session.close().await?)
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
