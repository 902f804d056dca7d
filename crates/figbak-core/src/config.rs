//! Run configuration shared by the CLI and the interactive wizard.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{BACKUPS_DIR, COOKIES_FILE, ROOT_DIR};
use crate::session::Credentials;

/// How the exporter decides a download has finished. The target application
/// never acknowledges the download, so both signals are proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionSignal {
    /// A bounded window of network idleness (the default).
    #[default]
    NetworkIdle,
    /// Disappearance of the transient visual-bell notification. Cheaper,
    /// but carries a higher false-positive risk.
    ToastCleared,
}

impl FromStr for CompletionSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "network-idle" => Ok(Self::NetworkIdle),
            "toast" => Ok(Self::ToastCleared),
            other => Err(format!(
                "unknown completion signal \"{}\" (expected \"network-idle\" or \"toast\")",
                other
            )),
        }
    }
}

/// Everything one backup run needs. Both the flag surface and the wizard
/// produce this same shape.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub credentials: Credentials,
    pub access_token: String,
    pub project_ids: Vec<String>,
    /// Delay between UI interactions, absorbing animation/debounce latency.
    pub interaction_delay: Duration,
    /// Delay between keystrokes when filling forms and the palette.
    pub typing_delay: Duration,
    /// Upper bound on waiting for one file's download to complete.
    pub download_timeout: Duration,
    pub completion_signal: CompletionSignal,
    /// Run the browser with a visible window.
    pub debug: bool,
    pub root_dir: PathBuf,
}

impl RunConfig {
    pub fn new(
        credentials: Credentials,
        access_token: impl Into<String>,
        project_ids: Vec<String>,
    ) -> Self {
        Self {
            credentials,
            access_token: access_token.into(),
            project_ids,
            interaction_delay: Duration::from_millis(2_000),
            typing_delay: Duration::from_millis(100),
            download_timeout: Duration::from_millis(30_000),
            completion_signal: CompletionSignal::default(),
            debug: false,
            root_dir: PathBuf::from(ROOT_DIR),
        }
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root_dir.join(BACKUPS_DIR)
    }

    pub fn cookies_path(&self) -> PathBuf {
        self.root_dir.join(COOKIES_FILE)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
