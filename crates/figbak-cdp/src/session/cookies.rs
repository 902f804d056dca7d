//! Cookie jar and download sink operations for the CDP page session.

use std::path::Path;

use serde_json::json;
use tracing::debug;

use figbak_core::session::{CookieSet, SessionCookie};

use crate::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Install a cookie set into the browser's cookie jar.
    pub async fn set_cookies(&self, cookies: &[SessionCookie]) -> Result<(), CdpError> {
        self.call(
            "Network.setCookies",
            Some(json!({"cookies": serde_json::to_value(cookies)?})),
        )
        .await?;
        debug!("Installed {} cookies", cookies.len());
        Ok(())
    }

    /// The cookies visible to the current page.
    pub async fn get_cookies(&self) -> Result<CookieSet, CdpError> {
        let result = self.call("Network.getCookies", None).await?;
        Ok(serde_json::from_value(result["cookies"].clone())?)
    }

    /// Point this page's download sink at `dir`.
    pub async fn set_download_behavior(&self, dir: &Path) -> Result<(), CdpError> {
        self.call(
            "Page.setDownloadBehavior",
            Some(json!({
                "behavior": "allow",
                "downloadPath": dir.to_string_lossy(),
            })),
        )
        .await?;
        debug!("Download sink set to {}", dir.display());
        Ok(())
    }
}
