//! Name discovery for agents, skills, and commands.
//!
//! Discovery is scoped to exactly one `.claude` directory: project-scope
//! settings see only the project's directories, user-scope settings only the
//! home ones. The two scopes never fall back to each other.
//!
//! All reads are best-effort. A missing directory yields an empty set; an
//! unreadable entry is logged and skipped. Only cancellation aborts a scan.

use std::collections::HashSet;
use std::path::{
    Path,
    PathBuf,
};

use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::paths::{
    AGENTS_DIR,
    COMMANDS_DIR,
    SKILL_FILE,
    SKILLS_DIR,
};
use crate::util::error::Error;

/// The agent and skill/command names visible to one settings-file scope.
///
/// Commands are merged into the skill set because they share the `/name`
/// namespace.
#[derive(Debug, Clone, Default)]
pub struct NameSets {
    pub agents: HashSet<String>,
    pub skills: HashSet<String>,
}

/// Scans `<claude_dir>/{agents,skills,commands}` for names.
///
/// - An agent contributes its frontmatter `name` only; files without a
///   string `name` are skipped (the filename is never used).
/// - A skill contributes its frontmatter `name`, falling back to the
///   directory name of the `SKILL.md`.
/// - A command contributes its frontmatter `name`, falling back to the
///   filename without extension.
pub async fn scan_names(token: &CancellationToken, claude_dir: &Path) -> Result<NameSets, Error> {
    let mut names = NameSets::default();

    scan_agents(token, &claude_dir.join(AGENTS_DIR), &mut names.agents).await?;
    scan_skills(token, &claude_dir.join(SKILLS_DIR), &mut names.skills).await?;
    scan_commands(token, &claude_dir.join(COMMANDS_DIR), &mut names.skills).await?;

    Ok(names)
}

async fn scan_agents(token: &CancellationToken, dir: &Path, into: &mut HashSet<String>) -> Result<(), Error> {
    for path in markdown_files(token, dir).await? {
        if token.is_cancelled() {
            return Err(Error::Interrupted);
        }
        let Ok(contents) = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| warn!(?e, "failed to read agent file {:?}", path))
        else {
            continue;
        };
        if let Some(name) = frontmatter_name(&contents) {
            into.insert(name);
        }
    }
    Ok(())
}

async fn scan_skills(token: &CancellationToken, dir: &Path, into: &mut HashSet<String>) -> Result<(), Error> {
    let Some(mut read_dir) = open_dir(token, dir).await? else {
        return Ok(());
    };

    while let Some(entry) = next_entry(&mut read_dir, dir).await {
        if token.is_cancelled() {
            return Err(Error::Interrupted);
        }
        let entry_path = entry.path();
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let Some(dir_name) = entry_path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        let manifest = entry_path.join(SKILL_FILE);
        let Ok(contents) = tokio::fs::read_to_string(&manifest).await else {
            // Subdirectories without a SKILL.md are not skills.
            continue;
        };
        into.insert(frontmatter_name(&contents).unwrap_or(dir_name));
    }
    Ok(())
}

async fn scan_commands(token: &CancellationToken, dir: &Path, into: &mut HashSet<String>) -> Result<(), Error> {
    for path in markdown_files(token, dir).await? {
        if token.is_cancelled() {
            return Err(Error::Interrupted);
        }
        let Ok(contents) = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| warn!(?e, "failed to read command file {:?}", path))
        else {
            continue;
        };
        let fallback = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        match frontmatter_name(&contents).or(fallback) {
            Some(name) => {
                into.insert(name);
            },
            None => continue,
        }
    }
    Ok(())
}

/// Lists the regular `.md` files directly under `dir`.
async fn markdown_files(token: &CancellationToken, dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let Some(mut read_dir) = open_dir(token, dir).await? else {
        return Ok(vec![]);
    };

    let mut files = Vec::new();
    while let Some(entry) = next_entry(&mut read_dir, dir).await {
        let entry_path = entry.path();
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        if entry_path.extension().is_some_and(|ext| ext == "md") {
            files.push(entry_path);
        }
    }
    Ok(files)
}

/// Opens `dir` for iteration. A missing or unreadable directory is demoted to
/// `None`; cancellation is the only error.
async fn open_dir(token: &CancellationToken, dir: &Path) -> Result<Option<tokio::fs::ReadDir>, Error> {
    if token.is_cancelled() {
        return Err(Error::Interrupted);
    }
    match tokio::fs::read_dir(dir).await {
        Ok(read_dir) => Ok(Some(read_dir)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => {
            warn!(?e, "failed to read directory {:?}", dir);
            Ok(None)
        },
    }
}

async fn next_entry(read_dir: &mut tokio::fs::ReadDir, dir: &Path) -> Option<tokio::fs::DirEntry> {
    match read_dir.next_entry().await {
        Ok(entry) => entry,
        Err(e) => {
            warn!(?e, "failed to read directory entry in {:?}", dir);
            None
        },
    }
}

#[derive(Debug, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    name: Option<serde_yaml::Value>,
}

/// Extracts the `name` field from YAML frontmatter delimited by `---` at the
/// start of the file and a closing `---` line.
///
/// Returns `None` when the frontmatter is missing or malformed, or when
/// `name` is absent or not a string.
fn frontmatter_name(raw: &str) -> Option<String> {
    let rest = raw.trim_start_matches('\n');
    let after_open = rest.strip_prefix("---")?;
    let close = after_open.find("\n---")?;
    let yaml_block = &after_open[..close];

    let fm: Frontmatter = serde_yaml::from_str(yaml_block).ok()?;
    match fm.name {
        Some(serde_yaml::Value::String(name)) if !name.is_empty() => Some(name),
        _ => None,
    }
}
