mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    ArgAction,
    Parser,
};
use eyre::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::report::Mode;

#[derive(Debug, Clone, Parser)]
#[command(name = "cctidy", version, about = "Tidy Claude Code configuration files")]
pub struct CliArgs {
    /// Project root whose settings files should be tidied
    #[arg(value_name = "PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,
    /// Process only the user-scope files
    #[arg(long, conflicts_with = "project_root")]
    pub no_project: bool,
    /// Print what would change without writing anything
    #[arg(long, short = 'n')]
    pub dry_run: bool,
    /// Write nothing; exit 1 if any file would change
    #[arg(long, conflicts_with = "dry_run")]
    pub check: bool,
    /// Activate the Bash sweeper regardless of configuration
    #[arg(long)]
    pub unsafe_bash: bool,
    /// Skip backup creation
    #[arg(long)]
    pub no_backup: bool,
    /// Increase reporting verbosity
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    pub async fn execute(self) -> Result<ExitCode> {
        Self::setup_logging();

        let token = CancellationToken::new();
        let ctrl_c_token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c_token.cancel();
            }
        });

        run::execute(self, token).await
    }

    pub fn mode(&self) -> Mode {
        if self.check {
            Mode::Check
        } else if self.dry_run {
            Mode::DryRun
        } else {
            Mode::Write
        }
    }

    fn setup_logging() {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_default();
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
