//! CLI definitions for figbak.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use figbak_core::{CompletionSignal, Credentials, RunConfig, constants};

/// figbak CLI.
#[derive(Parser)]
#[command(name = "figbak")]
#[command(about = "Back up Figma project files through a real browser session")]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run a backup configured from flags or environment variables
    Run(RunArgs),

    /// Collect the run configuration through interactive prompts
    Interactive,
}

#[derive(Args)]
pub(crate) struct RunArgs {
    /// Figma account email
    #[arg(short = 'e', long = "figma-email", env = "FIGMA_EMAIL")]
    pub email: String,

    /// Figma account password
    #[arg(short = 'p', long = "figma-password", env = "FIGMA_PASSWORD")]
    pub password: String,

    /// Figma personal access token for the REST API
    #[arg(short = 't', long = "figma-token", env = "FIGMA_TOKEN")]
    pub token: String,

    /// Ids of the projects to back up
    #[arg(long = "projects-ids", num_args = 1.., required_unless_present = "team_id")]
    pub project_ids: Vec<String>,

    /// Also back up every project of this team
    #[arg(long = "team-id")]
    pub team_id: Option<String>,

    /// Run the browser with a visible window
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// The file download timeout (in milliseconds)
    #[arg(long = "download-timeout", default_value_t = 30_000)]
    pub download_timeout: u64,

    /// The bot's interaction delay (in milliseconds)
    #[arg(long = "interaction-delay", default_value_t = 2_000)]
    pub interaction_delay: u64,

    /// The bot's typing delay (in milliseconds)
    #[arg(long = "typing-delay", default_value_t = 100)]
    pub typing_delay: u64,

    /// How the bot decides a download has finished
    #[arg(long = "completion-signal", default_value = "network-idle")]
    pub completion_signal: CompletionSignal,

    /// Root directory for cookies, the browser profile, and backups
    #[arg(long = "root-dir", default_value = constants::ROOT_DIR)]
    pub root_dir: PathBuf,
}

impl RunArgs {
    /// The team id, if any, plus the run configuration both CLI surfaces
    /// produce.
    pub fn into_config(self) -> (RunConfig, Option<String>) {
        let mut config = RunConfig::new(
            Credentials {
                email: self.email,
                password: self.password,
            },
            self.token,
            self.project_ids,
        );
        config.interaction_delay = Duration::from_millis(self.interaction_delay);
        config.typing_delay = Duration::from_millis(self.typing_delay);
        config.download_timeout = Duration::from_millis(self.download_timeout);
        config.completion_signal = self.completion_signal;
        config.debug = self.debug;
        config.root_dir = self.root_dir;
        (config, self.team_id)
    }
}
