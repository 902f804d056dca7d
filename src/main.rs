//! figbak: bulk-export backup bot for Figma projects.
//!
//! Figma exposes no bulk-export API, so the bot drives a real browser over
//! CDP: it logs in once (cookies first, credentials as fallback), then walks
//! the configured projects and saves a local copy of every file through the
//! in-app command palette.

mod cli;
mod wizard;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use figbak_cdp::{BrowserConfig, CdpBrowser};
use figbak_core::{
    AuthenticationManager, BackupOrchestrator, FigmaCatalog, FsCookieStore, RunConfig,
};

use crate::cli::{Cli, Commands};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let (config, team_id) = match cli.command {
        Commands::Run(args) => args.into_config(),
        Commands::Interactive => match wizard::collect() {
            Ok(config) => (config, None),
            Err(e) => {
                error!("Interactive setup failed: {}", e);
                std::process::exit(1);
            }
        },
    };

    if let Err(e) = run(config, team_id).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(mut config: RunConfig, team_id: Option<String>) -> anyhow::Result<()> {
    let catalog = FigmaCatalog::new(config.access_token.clone());

    if let Some(team_id) = team_id {
        let projects = catalog.team_projects(&team_id).await?;
        info!(team = %team_id, projects = projects.len(), "Expanded team into projects");
        config
            .project_ids
            .extend(projects.into_iter().map(|p| p.id));
    }

    let store = FsCookieStore::new(config.cookies_path());
    let auth = AuthenticationManager::new(
        config.credentials.clone(),
        store,
        config.interaction_delay,
        config.typing_delay,
    );
    let browser = CdpBrowser::new(BrowserConfig {
        headless: !config.debug,
        profile_dir: config.root_dir.join("browser-profile"),
        ..BrowserConfig::default()
    });

    let mut orchestrator = BackupOrchestrator::new(config, browser, catalog, auth);
    let report = orchestrator.run().await?;

    info!(
        completed = report.completed(),
        timed_out = report.timed_out(),
        elapsed_s = report.elapsed.as_secs(),
        "Done"
    );
    Ok(())
}
