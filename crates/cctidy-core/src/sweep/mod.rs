//! The sweeper pipeline: entry classification, per-tool decisions, and the
//! dispatcher that rewrites `permissions.allow` and `permissions.ask`.
//!
//! The dispatcher owns ordering and statistics; every decision lives in the
//! per-tool modules. `permissions.deny` is never touched.

pub mod entry;

mod bash;
mod files;
mod mcp;
mod plugin;
mod skill;
mod task;

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::BashSweepConfig;
use crate::mcp::McpServerSets;
use crate::plugins::EnabledPlugins;
use crate::resolve::ResolveDirs;
use crate::scan::NameSets;
use crate::util::check::PathChecker;
use crate::util::error::Error;
use entry::{
    ToolEntry,
    ToolName,
};

/// Whether a settings file lives under the user's home or under a project.
///
/// The scope controls which name sets and which MCP server sets apply; the
/// two scopes never fall back to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    User,
    Project,
}

/// Everything the sweepers need to evaluate one settings file.
#[derive(Debug, Clone)]
pub struct SweepContext {
    pub scope: Scope,
    pub dirs: ResolveDirs,
    pub names: NameSets,
    pub mcp_servers: McpServerSets,
    pub enabled_plugins: Option<EnabledPlugins>,
    pub bash: BashSweepConfig,
    pub checker: Arc<dyn PathChecker>,
    pub token: CancellationToken,
}

/// Statistics from sweeping one settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepResult {
    pub swept_allow: usize,
    pub swept_ask: usize,
    /// Diagnostics for entries that were kept because they could not be
    /// judged safely. Warnings are not errors.
    pub warns: Vec<String>,
}

impl SweepResult {
    pub fn swept_total(&self) -> usize {
        self.swept_allow + self.swept_ask
    }
}

/// One per-tool verdict. A warning always keeps the entry and records a
/// diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Decision {
    Keep,
    Sweep,
    Warn(String),
}

/// Rewrites `permissions.allow` and `permissions.ask` in place, deleting
/// entries whose referent no longer exists.
///
/// `permissions.deny` is skipped entirely. Values that are not arrays are
/// left untouched; non-string array elements are preserved as-is. Removal
/// preserves the relative order of the remaining entries.
pub async fn sweep_settings(ctx: &SweepContext, settings: &mut Value) -> Result<SweepResult, Error> {
    let mut result = SweepResult::default();

    let Some(permissions) = settings.get_mut("permissions").and_then(Value::as_object_mut) else {
        return Ok(result);
    };

    for category in ["allow", "ask"] {
        let Some(entries) = permissions.get_mut(category).and_then(Value::as_array_mut) else {
            continue;
        };

        let mut kept = Vec::with_capacity(entries.len());
        let mut swept = 0usize;
        for value in entries.drain(..) {
            let Some(raw) = value.as_str() else {
                kept.push(value);
                continue;
            };
            match evaluate_entry(ctx, raw).await? {
                Decision::Keep => kept.push(value),
                Decision::Warn(warn) => {
                    result.warns.push(warn);
                    kept.push(value);
                },
                Decision::Sweep => swept += 1,
            }
        }
        *entries = kept;

        match category {
            "allow" => result.swept_allow = swept,
            _ => result.swept_ask = swept,
        }
    }

    Ok(result)
}

/// Routes one entry to its sweeper.
async fn evaluate_entry(ctx: &SweepContext, raw: &str) -> Result<Decision, Error> {
    let parsed = entry::parse(raw);
    match &parsed {
        ToolEntry::Unrecognized => Ok(Decision::Keep),
        ToolEntry::Mcp { raw } => {
            // The plugin form is not an MCP reference, even when no plugin
            // name can be extracted from it.
            if entry::is_plugin_form(raw) {
                Ok(plugin::evaluate(ctx, &parsed))
            } else {
                Ok(mcp::evaluate(ctx, raw))
            }
        },
        ToolEntry::Standard { tool, specifier } => {
            if entry::plugin_name(&parsed).is_some() {
                return Ok(plugin::evaluate(ctx, &parsed));
            }
            match tool {
                ToolName::Read | ToolName::Edit => files::evaluate(ctx, specifier).await,
                ToolName::Bash => bash::evaluate(ctx, specifier).await,
                ToolName::Task => Ok(task::evaluate(ctx, specifier)),
                ToolName::Skill => Ok(skill::evaluate(ctx, specifier)),
                // Every other recognized tool is never swept.
                ToolName::Write | ToolName::Mcp | ToolName::Other(_) => Ok(Decision::Keep),
            }
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::util::test::StaticPathChecker;

    /// A project-scope context over `/proj` with home `/home/testuser` and
    /// everything else empty.
    pub(crate) fn project_ctx(checker: StaticPathChecker) -> SweepContext {
        SweepContext {
            scope: Scope::Project,
            dirs: ResolveDirs::new(Some(PathBuf::from("/home/testuser")), Some(PathBuf::from("/proj"))),
            names: NameSets::default(),
            mcp_servers: McpServerSets::default(),
            enabled_plugins: None,
            bash: BashSweepConfig::default(),
            checker: Arc::new(checker),
            token: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn test_read_sweep_under_base() {
        let ctx = project_ctx(StaticPathChecker::with_paths(["/proj/src/a.go"]));
        let mut settings = json!({
            "permissions": {
                "allow": ["Read(./src/a.go)", "Read(./src/b.go)", "Read"],
            }
        });

        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result.swept_allow, 1);
        assert_eq!(result.swept_ask, 0);
        assert_eq!(settings["permissions"]["allow"], json!(["Read(./src/a.go)", "Read"]));
    }

    #[tokio::test]
    async fn test_deny_never_mutated() {
        let ctx = project_ctx(StaticPathChecker::nothing());
        let deny = json!(["Read(./gone)", "zebra", "Bash(rm -rf /)"]);
        let mut settings = json!({
            "permissions": {
                "allow": ["Read(./gone)"],
                "deny": deny.clone(),
            }
        });

        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result.swept_allow, 1);
        assert_eq!(settings["permissions"]["deny"], deny);
    }

    #[tokio::test]
    async fn test_unclassifiable_passthrough() {
        let ctx = project_ctx(StaticPathChecker::nothing());
        let mut settings = json!({
            "permissions": {
                "allow": ["Read", "Bash", "not a tool!", "1Bad(x)", 42, null],
                "ask": "not an array",
            }
        });
        let before = settings.clone();

        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result, SweepResult::default());
        assert_eq!(settings, before);
    }

    #[tokio::test]
    async fn test_conservative_default() {
        // Empty name sets, a checker that says yes to everything, no
        // enabledPlugins: nothing may be removed.
        let mut ctx = project_ctx(StaticPathChecker::everything());
        ctx.bash.enabled = true;
        let mut settings = json!({
            "permissions": {
                "allow": [
                    "Read(./src/a.go)",
                    "Bash(git -C /repo status)",
                    "Task(some-agent)",
                    "Skill(review)",
                    "Write(./new-file)",
                    "WebFetch(domain:example.com)",
                ],
                "ask": ["Edit(~/notes.md)"],
            }
        });
        let before = settings.clone();

        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result.swept_total(), 0);
        assert_eq!(settings, before);
    }

    #[tokio::test]
    async fn test_task_scope_isolation() {
        let mut ctx = project_ctx(StaticPathChecker::nothing());
        ctx.names.agents = ["alive-agent".to_string()].into();
        let mut settings = json!({
            "permissions": {
                "allow": ["Task(alive-agent)", "Task(home-agent)", "Task(Explore)", "Task(plugin:x)"],
            }
        });

        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result.swept_allow, 1);
        assert_eq!(
            settings["permissions"]["allow"],
            json!(["Task(alive-agent)", "Task(Explore)", "Task(plugin:x)"])
        );
    }

    #[tokio::test]
    async fn test_mcp_scope_asymmetry() {
        let entries = json!({"permissions": {"allow": ["mcp__github__t", "mcp__slack__t"]}});
        let servers = McpServerSets::for_tests(["github"], ["slack"]);

        let mut ctx = project_ctx(StaticPathChecker::nothing());
        ctx.scope = Scope::User;
        ctx.dirs.base = None;
        ctx.mcp_servers = servers.clone();
        let mut user_settings = entries.clone();
        let result = sweep_settings(&ctx, &mut user_settings).await.unwrap();
        assert_eq!(result.swept_allow, 1);
        assert_eq!(user_settings["permissions"]["allow"], json!(["mcp__github__t"]));

        let mut ctx = project_ctx(StaticPathChecker::nothing());
        ctx.mcp_servers = servers;
        let mut project_settings = entries.clone();
        let result = sweep_settings(&ctx, &mut project_settings).await.unwrap();
        assert_eq!(result.swept_allow, 0);
        assert_eq!(project_settings, entries);
    }

    #[tokio::test]
    async fn test_disabled_plugin_entries_swept() {
        let mut ctx = project_ctx(StaticPathChecker::nothing());
        ctx.enabled_plugins = Some(crate::plugins::EnabledPlugins::for_tests([
            ("github@official", true),
            ("linter@acme", false),
        ]));
        let mut settings = json!({
            "permissions": {
                "allow": [
                    "mcp__plugin_github_github__search_code",
                    "Skill(github:review)",
                    "Skill(linter:lint)",
                    "Task(linter:lint-agent)",
                ],
            }
        });

        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result.swept_allow, 2);
        assert_eq!(
            settings["permissions"]["allow"],
            json!(["mcp__plugin_github_github__search_code", "Skill(github:review)"])
        );
    }

    #[tokio::test]
    async fn test_merged_excludes_protect_bash_entries() {
        let mut ctx = project_ctx(StaticPathChecker::nothing());
        ctx.bash.enabled = true;
        ctx.bash.exclude_commands = vec!["mkdir".to_string(), "touch".to_string(), "cp".to_string()];
        let mut settings = json!({
            "permissions": {
                "allow": [
                    "Bash(mkdir /dead/a)",
                    "Bash(touch /dead/b)",
                    "Bash(cp /dead/b /dead/c)",
                    "Bash(git -C /dead/repo status)",
                ],
            }
        });

        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result.swept_allow, 1);
        assert_eq!(
            settings["permissions"]["allow"],
            json!(["Bash(mkdir /dead/a)", "Bash(touch /dead/b)", "Bash(cp /dead/b /dead/c)"])
        );
    }

    #[tokio::test]
    async fn test_ask_and_allow_counted_separately() {
        let ctx = project_ctx(StaticPathChecker::nothing());
        let mut settings = json!({
            "permissions": {
                "allow": ["Read(./gone-a)"],
                "ask": ["Read(./gone-b)", "Read(./gone-c)"],
            }
        });

        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result.swept_allow, 1);
        assert_eq!(result.swept_ask, 2);
    }

    #[tokio::test]
    async fn test_empty_mcp_server_name_warns() {
        let ctx = project_ctx(StaticPathChecker::nothing());
        let mut settings = json!({"permissions": {"allow": ["mcp____tool"]}});

        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result.swept_allow, 0);
        assert_eq!(result.warns.len(), 1);
        assert_eq!(settings["permissions"]["allow"], json!(["mcp____tool"]));
    }

    #[tokio::test]
    async fn test_missing_permissions_is_noop() {
        let ctx = project_ctx(StaticPathChecker::nothing());
        let mut settings = json!({"model": "opus"});
        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result, SweepResult::default());

        let mut settings = json!({"permissions": "bogus"});
        let result = sweep_settings(&ctx, &mut settings).await.unwrap();
        assert_eq!(result, SweepResult::default());
    }

    #[tokio::test]
    async fn test_cancellation_propagates() {
        let ctx = project_ctx(StaticPathChecker::nothing());
        ctx.token.cancel();
        let mut settings = json!({"permissions": {"allow": ["Read(./x)"]}});
        let result = sweep_settings(&ctx, &mut settings).await;
        assert!(matches!(result, Err(Error::Interrupted)));
    }
}
