//! The file-processing loop: discover candidate files, run each through the
//! pipeline, and write, report, or just compare depending on the mode.

use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;
use std::sync::Arc;

use cctidy_core::config;
use cctidy_core::mcp;
use cctidy_core::paths;
use cctidy_core::pipeline;
use cctidy_core::plugins;
use cctidy_core::resolve::ResolveDirs;
use cctidy_core::scan::{
    self,
    NameSets,
};
use cctidy_core::{
    Error,
    PathChecker,
    Scope,
    SweepContext,
    SweepResult,
    SystemPathChecker,
};
use eyre::Result;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::CliArgs;
use crate::io;
use crate::report::{
    Mode,
    Reporter,
};

pub async fn execute(args: CliArgs, token: CancellationToken) -> Result<ExitCode> {
    let runner = Runner::new(args, token);
    match runner.run().await {
        Ok(code) => Ok(code),
        Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::Interrupted)) => {
            eprintln!("interrupted");
            Ok(ExitCode::from(130))
        },
        // Fatal to the whole run: invalid sweep config, unreadable files.
        Err(e) => {
            eprintln!("error: {e:#}");
            Ok(ExitCode::from(2))
        },
    }
}

struct Runner {
    args: CliArgs,
    token: CancellationToken,
    reporter: Reporter,
    checker: Arc<dyn PathChecker>,
    changed: bool,
    failed: bool,
}

impl Runner {
    fn new(args: CliArgs, token: CancellationToken) -> Self {
        let reporter = Reporter::new(args.mode(), args.verbose);
        Self {
            args,
            token,
            reporter,
            checker: Arc::new(SystemPathChecker),
            changed: false,
            failed: false,
        }
    }

    async fn run(mut self) -> Result<ExitCode> {
        let home = dirs::home_dir();
        let config_dir = dirs::config_dir();
        let project_root = self.project_root()?;
        debug!(?home, ?project_root, "tidying configuration files");

        let bash = config::load_bash_config(
            &self.token,
            config_dir.as_deref(),
            project_root.as_deref(),
            self.args.unsafe_bash,
        )
        .await?;

        let root_config_path = home.as_ref().map(|h| h.join(paths::ROOT_CONFIG_FILE));
        let mcp_servers =
            mcp::load_mcp_servers(&self.token, root_config_path.as_deref(), project_root.as_deref()).await?;

        let user_claude = home.as_ref().map(|h| h.join(paths::CLAUDE_DIR));
        let project_claude = project_root.as_ref().map(|r| r.join(paths::CLAUDE_DIR));

        // The four settings files, user scope before project scope, shared
        // before local.
        let mut settings_files: Vec<(Scope, PathBuf)> = Vec::new();
        for (scope, claude_dir) in [(Scope::User, &user_claude), (Scope::Project, &project_claude)] {
            if let Some(dir) = claude_dir {
                settings_files.push((scope, dir.join(paths::SETTINGS_FILE)));
                settings_files.push((scope, dir.join(paths::SETTINGS_LOCAL_FILE)));
            }
        }

        let plugin_sources: Vec<&Path> = settings_files.iter().map(|(_, path)| path.as_path()).collect();
        let enabled_plugins = plugins::load_enabled_plugins(&self.token, &plugin_sources).await?;

        let user_names = self.scan_scope(user_claude.as_deref()).await?;
        let project_names = self.scan_scope(project_claude.as_deref()).await?;

        if let Some(path) = &root_config_path {
            self.process_root_config(path).await?;
        }

        for (scope, path) in &settings_files {
            let ctx = SweepContext {
                scope: *scope,
                dirs: match scope {
                    Scope::User => ResolveDirs::new(home.clone(), None),
                    Scope::Project => ResolveDirs::new(home.clone(), project_root.clone()),
                },
                names: match scope {
                    Scope::User => user_names.clone(),
                    Scope::Project => project_names.clone(),
                },
                mcp_servers: mcp_servers.clone(),
                enabled_plugins: enabled_plugins.clone(),
                bash: bash.clone(),
                checker: Arc::clone(&self.checker),
                token: self.token.clone(),
            };
            self.process_settings(&ctx, path).await?;
        }

        Ok(self.exit_code())
    }

    fn project_root(&self) -> Result<Option<PathBuf>> {
        if self.args.no_project {
            return Ok(None);
        }
        let root = match &self.args.project_root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        Ok(Some(std::path::absolute(root)?))
    }

    async fn scan_scope(&self, claude_dir: Option<&Path>) -> Result<NameSets> {
        match claude_dir {
            Some(dir) => Ok(scan::scan_names(&self.token, dir).await?),
            None => Ok(NameSets::default()),
        }
    }

    async fn process_root_config(&mut self, path: &Path) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(Error::Interrupted.into());
        }
        let Some(input) = io::read_optional(path).await? else {
            return Ok(());
        };
        match pipeline::process_root_config(&*self.checker, &self.token, &input).await {
            Ok(output) => self.apply(path, &input, &output, None).await,
            Err(e) => self.fail(path, e),
        }
    }

    async fn process_settings(&mut self, ctx: &SweepContext, path: &Path) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(Error::Interrupted.into());
        }
        let Some(input) = io::read_optional(path).await? else {
            return Ok(());
        };
        match pipeline::process_settings(ctx, &input).await {
            Ok((output, result)) => self.apply(path, &input, &output, Some(result)).await,
            Err(e) => self.fail(path, e),
        }
    }

    async fn apply(&mut self, path: &Path, input: &[u8], output: &[u8], result: Option<SweepResult>) -> Result<()> {
        if output == input {
            self.reporter.file_unchanged(path, result.as_ref());
            return Ok(());
        }

        self.changed = true;
        self.reporter.file_changed(path, result.as_ref());
        if self.args.mode() == Mode::Write {
            if !self.args.no_backup {
                io::back_up(path).await?;
            }
            io::write_atomic(path, output).await?;
        }
        Ok(())
    }

    /// A per-file pipeline failure (bad JSON, usually): record it and move
    /// on to the remaining files. Cancellation aborts the whole run.
    fn fail(&mut self, path: &Path, error: Error) -> Result<()> {
        if matches!(error, Error::Interrupted) {
            return Err(error.into());
        }
        self.reporter.file_failed(path, &error);
        self.failed = true;
        Ok(())
    }

    fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::from(2)
        } else if self.args.mode() == Mode::Check && self.changed {
            ExitCode::from(1)
        } else {
            ExitCode::SUCCESS
        }
    }
}
