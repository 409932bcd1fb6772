//! Loading of registered MCP server names.
//!
//! Servers come from two places: the project's `.mcp.json` and the root
//! config file (both its top-level `mcpServers` and the `mcpServers` of
//! every entry under `projects`). The two origins are kept separate because
//! user-scope settings files must only be matched against the root set;
//! Claude Code never writes user-scope entries for project-only servers, and
//! mirroring that prevents false sweeps.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::sweep::Scope;
use crate::util::error::{
    Error,
    ErrorContext as _,
};

/// MCP server names split by where they were registered.
#[derive(Debug, Clone, Default)]
pub struct McpServerSets {
    from_root: HashSet<String>,
    from_project_mcp_json: HashSet<String>,
}

impl McpServerSets {
    /// Whether `server` is registered for the given settings-file scope.
    ///
    /// User scope sees only the root config's servers; project scope sees
    /// the union.
    pub fn contains(&self, scope: Scope, server: &str) -> bool {
        match scope {
            Scope::User => self.from_root.contains(server),
            Scope::Project => self.from_root.contains(server) || self.from_project_mcp_json.contains(server),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(
        from_root: impl IntoIterator<Item = &'static str>,
        from_project: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Self {
            from_root: from_root.into_iter().map(String::from).collect(),
            from_project_mcp_json: from_project.into_iter().map(String::from).collect(),
        }
    }
}

/// Reads the root config file and the project `.mcp.json` into a
/// [McpServerSets].
///
/// A missing file contributes an empty set; a present but malformed file is
/// a hard error.
pub async fn load_mcp_servers(
    token: &CancellationToken,
    root_config: Option<&Path>,
    project_root: Option<&Path>,
) -> Result<McpServerSets, Error> {
    let mut sets = McpServerSets::default();

    if let Some(path) = root_config {
        if let Some(root) = read_json(token, path).await? {
            collect_root_servers(&root, &mut sets.from_root);
        }
    }

    if let Some(root) = project_root {
        let path = root.join(crate::paths::PROJECT_MCP_CONFIG);
        if let Some(mcp_json) = read_json(token, &path).await? {
            collect_server_keys(&mcp_json, &mut sets.from_project_mcp_json);
        }
    }

    debug!(?sets, "loaded mcp server sets");
    Ok(sets)
}

/// Top-level `mcpServers` plus the `mcpServers` of every `projects` value.
fn collect_root_servers(root: &Value, into: &mut HashSet<String>) {
    collect_server_keys(root, into);
    if let Some(projects) = root.get("projects").and_then(Value::as_object) {
        for project in projects.values() {
            collect_server_keys(project, into);
        }
    }
}

fn collect_server_keys(value: &Value, into: &mut HashSet<String>) {
    if let Some(servers) = value.get("mcpServers").and_then(Value::as_object) {
        into.extend(servers.keys().cloned());
    }
}

async fn read_json(token: &CancellationToken, path: &Path) -> Result<Option<Value>, Error> {
    if token.is_cancelled() {
        return Err(Error::Interrupted);
    }
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        },
    };
    let value = serde_json::from_str(&contents).with_context(|| format!("invalid JSON in {}", path.display()))?;
    Ok(Some(value))
}
