//! Error types for the backup pipeline.

use thiserror::Error;

/// Errors surfaced by a browser driver implementation.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Navigation did not reach the expected location.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Element not found.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A bounded wait expired.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Browser not connected.
    #[error("Browser not connected")]
    NotConnected,

    /// Failed to launch the browser.
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Wire-level or protocol failure inside the driver.
    #[error("Driver error: {0}")]
    Protocol(String),
}

/// Errors from the vendor REST catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The API answered with a non-success status.
    #[error("Figma API request failed | {status} | {message}")]
    Api { status: u16, message: String },

    /// The request never produced an API answer.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Session establishment could not converge on an authenticated page.
///
/// The only fatal error produced below the orchestrator; it always aborts
/// the whole run.
#[derive(Debug, Error)]
#[error("Authorization failed | {reason}")]
pub struct AuthorizationError {
    pub reason: String,
    #[source]
    pub source: Option<DriverError>,
}

impl AuthorizationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            source: None,
        }
    }
}

impl From<DriverError> for AuthorizationError {
    fn from(e: DriverError) -> Self {
        Self {
            reason: e.to_string(),
            source: Some(e),
        }
    }
}

/// Top-level run failure. By the time this surfaces the browser has already
/// been torn down; callers see exactly one error kind.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Backup failed | {0}")]
    Authorization(#[from] AuthorizationError),

    #[error("Backup failed | {0}")]
    Catalog(#[from] CatalogError),

    #[error("Backup failed | {0}")]
    Driver(#[from] DriverError),

    #[error("Backup failed | {0}")]
    Io(#[from] std::io::Error),
}
