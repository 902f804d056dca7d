//! Navigation and selector operations for the CDP page session.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Navigate to a URL and wait for the document to load.
    pub async fn navigate(&self, url: &str) -> Result<(), CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(|e| e.as_str()) {
            if !error.is_empty() {
                return Err(CdpError::NavigationFailed(error.to_string()));
            }
        }

        self.wait_for_load().await?;
        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Wait for the current document to finish loading.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = std::time::Instant::now();
        let timeout = Duration::from_secs(30);

        loop {
            let result = self.evaluate("document.readyState").await?;

            if let Some(state) = result.as_str() {
                if state == "complete" || state == "interactive" {
                    return Ok(());
                }
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Wait for the next main-frame navigation to commit, or time out.
    pub async fn wait_for_navigation(&self, timeout: Duration) -> Result<(), CdpError> {
        let mut nav = self.events.subscribe_navigation();

        match tokio::time::timeout(timeout, nav.changed()).await {
            Ok(Ok(())) => {
                // The new document may still be loading.
                let _ = self.wait_for_load().await;
                Ok(())
            }
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => Err(CdpError::Timeout(format!(
                "No navigation within {:?}",
                timeout
            ))),
        }
    }

    /// Get the current URL.
    pub async fn current_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Query selector, returning the node id if present.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self.call("DOM.getDocument", Some(json!({"depth": 0}))).await?;
        let root_id = doc["root"]["nodeId"]
            .as_i64()
            .ok_or_else(|| CdpError::InvalidResponse("Missing document root".to_string()))?;

        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({
                    "nodeId": root_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_id = result["nodeId"].as_i64().unwrap_or(0);
        if node_id == 0 { Ok(None) } else { Ok(Some(node_id)) }
    }

    /// Whether any element matches `selector` right now.
    pub async fn selector_present(&self, selector: &str) -> Result<bool, CdpError> {
        Ok(self.query_selector(selector).await?.is_some())
    }

    /// Wait for a selector to appear, returning its node id.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<i64, CdpError> {
        let start = std::time::Instant::now();

        loop {
            if let Some(node_id) = self.query_selector(selector).await? {
                return Ok(node_id);
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for selector '{}' timed out",
                    selector
                )));
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}
