//! Top-level backup run driver.

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::auth::AuthenticationManager;
use crate::catalog::{FileRef, ProjectCatalog};
use crate::config::RunConfig;
use crate::driver::BrowserDriver;
use crate::error::BackupError;
use crate::export::{DocumentExporter, ExportOutcome};
use crate::store::CookieStore;

/// Run-level lifecycle. `Aborted` is reachable from any state and is always
/// preceded by browser teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    BrowserLaunched,
    Authenticating,
    Authenticated,
    ExportingProjects,
    Completed,
    Aborted,
}

/// What one run did.
#[derive(Debug, Default)]
pub struct BackupReport {
    pub elapsed: Duration,
    pub outcomes: Vec<(FileRef, ExportOutcome)>,
}

impl BackupReport {
    pub fn completed(&self) -> usize {
        self.count(ExportOutcome::Completed)
    }

    pub fn timed_out(&self) -> usize {
        self.count(ExportOutcome::TimedOut)
    }

    fn count(&self, outcome: ExportOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// Owns the browser for one run: authenticates once, then walks projects
/// and their files strictly sequentially. One page drives the shared
/// session at a time, so the palette and download sink never interfere
/// across exports.
pub struct BackupOrchestrator<B, C, S>
where
    B: BrowserDriver,
    C: ProjectCatalog,
    S: CookieStore,
{
    config: RunConfig,
    browser: B,
    catalog: C,
    auth: AuthenticationManager<S>,
    state: RunState,
}

impl<B, C, S> BackupOrchestrator<B, C, S>
where
    B: BrowserDriver,
    C: ProjectCatalog,
    S: CookieStore,
{
    pub fn new(config: RunConfig, browser: B, catalog: C, auth: AuthenticationManager<S>) -> Self {
        Self {
            config,
            browser,
            catalog,
            auth,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the whole backup. Exactly one error kind escapes, and the
    /// browser is always torn down before it does.
    pub async fn run(&mut self) -> Result<BackupReport, BackupError> {
        let started = Instant::now();
        info!("Starting the backup task");

        let run_dir = self
            .config
            .backups_dir()
            .join(Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string());

        let mut report = BackupReport::default();
        let result = self.execute(&run_dir, &mut report).await;

        if let Err(e) = self.browser.close().await {
            warn!("Browser teardown failed: {}", e);
        }

        match result {
            Ok(()) => {
                self.transition(RunState::Completed);
                report.elapsed = started.elapsed();
                info!(
                    elapsed_s = report.elapsed.as_secs(),
                    completed = report.completed(),
                    timed_out = report.timed_out(),
                    "Backup task finished"
                );
                Ok(report)
            }
            Err(e) => {
                self.transition(RunState::Aborted);
                error!("Backup task aborted: {}", e);
                Err(e)
            }
        }
    }

    async fn execute(&mut self, run_dir: &Path, report: &mut BackupReport) -> Result<(), BackupError> {
        self.prepare_layout()?;

        self.browser.launch().await?;
        self.transition(RunState::BrowserLaunched);

        self.transition(RunState::Authenticating);
        let page = self.browser.initial_page().await?;
        self.auth.authenticate(&page).await?;
        self.transition(RunState::Authenticated);

        self.transition(RunState::ExportingProjects);
        let exporter: DocumentExporter<B::Page> = DocumentExporter::from_config(&self.config);

        let project_ids = self.config.project_ids.clone();
        for project_id in &project_ids {
            let project = self.catalog.project_files(project_id).await?;
            info!(project = %project.name, files = project.files.len(), "Backing up project");

            let project_dir = run_dir.join(dir_name(&project.name));
            std::fs::create_dir_all(&project_dir)?;

            for file in &project.files {
                let page = self.browser.open_page().await?;
                let outcome = exporter.export(page, file, &project_dir).await;
                report.outcomes.push((file.clone(), outcome));
            }
        }
        Ok(())
    }

    fn prepare_layout(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.config.backups_dir())?;
        // A cookie set is never trusted across invocations without
        // re-verification; drop the previous run's file up front.
        match std::fs::remove_file(self.config.cookies_path()) {
            Ok(()) => debug!("Removed stale cookie file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }
}

/// Project names become directory names; keep them filesystem-safe.
fn dir_name(project_name: &str) -> String {
    project_name.replace(['/', '\\'], "-")
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
