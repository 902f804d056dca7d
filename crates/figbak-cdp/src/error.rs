//! CDP error types.

use thiserror::Error;

use figbak_core::DriverError;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not reachable on the debugging port.
    #[error("Chrome not available at {0}")]
    ChromeNotAvailable(String),

    /// No Chrome/Chromium binary on this machine.
    #[error("Chrome not found. Please install Google Chrome or Chromium.")]
    ChromeNotFound,

    /// Failed to launch Chrome.
    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Page not found.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Navigation failed.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Element not found.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// JavaScript execution error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// Timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Session closed.
    #[error("Session closed")]
    SessionClosed,

    /// Invalid response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<CdpError> for DriverError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::NavigationFailed(msg) => DriverError::NavigationFailed(msg),
            CdpError::ElementNotFound(msg) => DriverError::ElementNotFound(msg),
            CdpError::Timeout(msg) => DriverError::Timeout(msg),
            CdpError::SessionClosed => DriverError::NotConnected,
            CdpError::ChromeNotFound | CdpError::ChromeNotAvailable(_) => {
                DriverError::LaunchFailed(e.to_string())
            }
            CdpError::LaunchFailed(msg) => DriverError::LaunchFailed(msg),
            other => DriverError::Protocol(other.to_string()),
        }
    }
}
