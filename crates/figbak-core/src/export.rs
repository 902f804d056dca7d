//! Per-document export pipeline.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::catalog::FileRef;
use crate::config::{CompletionSignal, RunConfig};
use crate::constants::{
    EXPORT_COMMAND, PALETTE_RESULT, PALETTE_SEARCH, PROGRESS_BAR, VISUAL_BELL, file_url,
};
use crate::driver::PageDriver;
use crate::error::DriverError;
use crate::navigation::NavigationGate;

/// Lifecycle of one document export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Queued,
    PageOpened,
    Navigated,
    CommandPaletteOpened,
    CommandTyped,
    CommandExecuted,
    AwaitingCompletion,
    Completed,
    TimedOut,
}

/// Transient per-file state; discarded once the exporter returns.
#[derive(Debug)]
pub struct ExportJob {
    pub file: FileRef,
    pub phase: Phase,
    pub started_at: Instant,
}

impl ExportJob {
    fn new(file: FileRef) -> Self {
        Self {
            file,
            phase: Phase::Queued,
            started_at: Instant::now(),
        }
    }

    fn advance(&mut self, phase: Phase) {
        debug!(file = %self.file.name, ?phase, "export phase");
        self.phase = phase;
    }
}

/// Terminal result of one export. Failures never escape the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed,
    TimedOut,
}

/// Strategy deciding when an export is (probably) finished.
///
/// The target application never acknowledges the download, so every signal
/// here is a proxy; implementations trade accuracy differently.
#[async_trait]
pub trait CompletionProbe<P: PageDriver>: Send + Sync {
    async fn wait(&self, page: &P, timeout: Duration) -> Result<(), DriverError>;
}

/// Completion = no network request in flight for a quiet window.
pub struct NetworkIdleProbe {
    pub quiet_window: Duration,
}

#[async_trait]
impl<P: PageDriver> CompletionProbe<P> for NetworkIdleProbe {
    async fn wait(&self, page: &P, timeout: Duration) -> Result<(), DriverError> {
        page.wait_for_network_idle(self.quiet_window, timeout).await
    }
}

/// Completion = the transient visual-bell notification is gone.
///
/// A purely DOM-level proxy; fires early when the bell never shows at all.
pub struct ToastClearedProbe {
    pub selector: String,
    pub poll_interval: Duration,
}

#[async_trait]
impl<P: PageDriver> CompletionProbe<P> for ToastClearedProbe {
    async fn wait(&self, page: &P, timeout: Duration) -> Result<(), DriverError> {
        let start = Instant::now();
        // Let the bell appear before polling it away.
        tokio::time::sleep(self.poll_interval).await;
        loop {
            if !page.selector_present(&self.selector).await? {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(DriverError::Timeout(format!(
                    "Element {} still present after {:?}",
                    self.selector, timeout
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Drives the in-app export of a single document and detects completion.
pub struct DocumentExporter<P: PageDriver> {
    interaction_delay: Duration,
    typing_delay: Duration,
    download_timeout: Duration,
    gate: NavigationGate,
    probe: Box<dyn CompletionProbe<P>>,
}

impl<P: PageDriver> DocumentExporter<P> {
    pub fn from_config(config: &RunConfig) -> Self {
        let probe: Box<dyn CompletionProbe<P>> = match config.completion_signal {
            CompletionSignal::NetworkIdle => Box::new(NetworkIdleProbe {
                // The export itself produces traffic; the quiet window must
                // outlast the app's own debounce chatter.
                quiet_window: Duration::from_secs(5) + config.interaction_delay,
            }),
            CompletionSignal::ToastCleared => Box::new(ToastClearedProbe {
                selector: VISUAL_BELL.to_string(),
                poll_interval: Duration::from_millis(250),
            }),
        };
        Self {
            interaction_delay: config.interaction_delay,
            typing_delay: config.typing_delay,
            download_timeout: config.download_timeout,
            gate: NavigationGate::new(10, Duration::from_secs(5)),
            probe,
        }
    }

    /// Export one document on a freshly opened page.
    ///
    /// All failures are resolved here: the page is closed exactly once on
    /// every exit path and the file reported timed out, so one bad document
    /// never stops the batch.
    pub async fn export(&self, page: P, file: &FileRef, download_dir: &Path) -> ExportOutcome {
        let mut job = ExportJob::new(file.clone());
        job.advance(Phase::PageOpened);

        info!(file = %file.name, "Backing up file");

        let outcome = match self.drive(&page, &mut job, download_dir).await {
            Ok(()) => {
                job.advance(Phase::Completed);
                info!(file = %file.name, "File downloaded (completion inferred, not confirmed)");
                ExportOutcome::Completed
            }
            Err(e) => {
                job.advance(Phase::TimedOut);
                warn!(
                    file = %file.name,
                    elapsed_s = job.started_at.elapsed().as_secs(),
                    limit_s = self.download_timeout.as_secs(),
                    "Export aborted: {}", e
                );
                ExportOutcome::TimedOut
            }
        };

        // Let straggling requests drain before tearing the page down.
        tokio::time::sleep(self.interaction_delay * 2).await;
        if let Err(e) = page.close().await {
            warn!(file = %file.name, "Failed to close page: {}", e);
        }

        outcome
    }

    async fn drive(
        &self,
        page: &P,
        job: &mut ExportJob,
        download_dir: &Path,
    ) -> Result<(), DriverError> {
        let url = file_url(&job.file.id);
        page.goto(&url).await?;
        self.gate.settle(page).await;

        let location = page.current_url().await?;
        if !location.contains(&url) {
            return Err(DriverError::NavigationFailed(format!(
                "File with id \"{}\" page loading failed (landed on {})",
                job.file.id, location
            )));
        }
        job.advance(Phase::Navigated);

        // The editor hides its progress bar once the document is in.
        tokio::time::sleep(self.interaction_delay).await;
        self.wait_until_gone(page, PROGRESS_BAR, self.interaction_delay)
            .await?;

        tokio::time::sleep(self.interaction_delay).await;
        page.set_download_dir(download_dir).await?;

        page.key_chord(palette_chord_modifier(), "p").await?;
        page.wait_for_selector(PALETTE_SEARCH, self.interaction_delay)
            .await?;
        job.advance(Phase::CommandPaletteOpened);

        page.type_text(EXPORT_COMMAND, self.typing_delay).await?;
        page.wait_for_selector(PALETTE_RESULT, self.interaction_delay)
            .await?;
        job.advance(Phase::CommandTyped);

        page.press_key("Enter").await?;
        job.advance(Phase::CommandExecuted);

        job.advance(Phase::AwaitingCompletion);
        self.probe.wait(page, self.download_timeout).await
    }

    async fn wait_until_gone(
        &self,
        page: &P,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let start = Instant::now();
        loop {
            if !page.selector_present(selector).await? {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(DriverError::Timeout(format!(
                    "Element {} still present after {:?}",
                    selector, timeout
                )));
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

/// Platform modifier for the command palette chord.
pub fn palette_chord_modifier() -> &'static str {
    if cfg!(target_os = "macos") { "Meta" } else { "Control" }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
