//! Layered TOML configuration for the Bash sweeper.
//!
//! Three layers in order of increasing precedence: the global config under
//! the platform config directory, the project's shared `cctidy.toml`, and
//! the project's `cctidy.local.toml`. The runtime unsafe switch acts as a
//! fourth implicit layer that turns the sweeper on.
//!
//! ```toml
//! [sweep.bash]
//! enabled = true
//! exclude_entries = ["rm -rf /tmp/scratch"]
//! exclude_commands = ["mkdir", "touch"]
//! exclude_paths = ["/opt/tools", "relative/to/project"]
//! ```

use std::path::{
    Path,
    PathBuf,
};

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::paths::{
    CLAUDE_DIR,
    GLOBAL_SWEEP_CONFIG,
    SWEEP_CONFIG_FILE,
    SWEEP_CONFIG_LOCAL_FILE,
};
use crate::util::error::{
    Error,
    ErrorContext as _,
};

/// Effective Bash sweeper configuration after the layer merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BashSweepConfig {
    /// The Bash sweeper is opt-in; it deletes entries based on heuristics.
    pub enabled: bool,
    /// Entries kept verbatim, matched against the whole specifier.
    pub exclude_entries: Vec<String>,
    /// Commands kept, matched against the specifier's first token.
    pub exclude_commands: Vec<String>,
    /// Path prefixes under which extracted candidates are never checked.
    pub exclude_paths: Vec<PathBuf>,
}

/// One TOML layer as parsed, before merging.
///
/// `enabled` stays an `Option` so the merge can distinguish "not specified
/// at this layer" from an explicit `false`.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawBash {
    enabled: Option<bool>,
    #[serde(default)]
    exclude_entries: Vec<String>,
    #[serde(default)]
    exclude_commands: Vec<String>,
    #[serde(default)]
    exclude_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawSweep {
    #[serde(default)]
    bash: RawBash,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    sweep: RawSweep,
}

/// Loads and merges the three config layers plus the runtime unsafe switch.
///
/// Invalid TOML in any present layer is a hard error; a missing layer is
/// skipped. Relative `exclude_paths` in the project layers are resolved
/// against the project root; global-layer paths are taken literally.
pub async fn load_bash_config(
    token: &CancellationToken,
    global_config_dir: Option<&Path>,
    project_root: Option<&Path>,
    unsafe_switch: bool,
) -> Result<BashSweepConfig, Error> {
    let mut layers: Vec<(RawBash, Option<&Path>)> = Vec::new();

    if let Some(config_dir) = global_config_dir {
        if let Some(layer) = read_layer(token, &config_dir.join(GLOBAL_SWEEP_CONFIG)).await? {
            layers.push((layer, None));
        }
    }
    if let Some(root) = project_root {
        let claude_dir = root.join(CLAUDE_DIR);
        for file in [SWEEP_CONFIG_FILE, SWEEP_CONFIG_LOCAL_FILE] {
            if let Some(layer) = read_layer(token, &claude_dir.join(file)).await? {
                layers.push((layer, Some(root)));
            }
        }
    }

    let mut enabled: Option<bool> = None;
    let mut merged = BashSweepConfig::default();
    for (layer, resolve_against) in layers {
        if layer.enabled.is_some() {
            enabled = layer.enabled;
        }
        extend_unique(&mut merged.exclude_entries, layer.exclude_entries);
        extend_unique(&mut merged.exclude_commands, layer.exclude_commands);
        let paths = layer.exclude_paths.into_iter().map(|p| match resolve_against {
            Some(root) if Path::new(&p).is_relative() => root.join(p),
            _ => PathBuf::from(p),
        });
        extend_unique(&mut merged.exclude_paths, paths);
    }
    merged.enabled = unsafe_switch || enabled.unwrap_or(false);

    Ok(merged)
}

/// Order-preserving unique append; the `exclude_*` arrays are sets with
/// stable first-seen order for diagnostics.
fn extend_unique<T: PartialEq>(into: &mut Vec<T>, items: impl IntoIterator<Item = T>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

async fn read_layer(token: &CancellationToken, path: &Path) -> Result<Option<RawBash>, Error> {
    if token.is_cancelled() {
        return Err(Error::Interrupted);
    }
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    let config: RawConfig =
        toml::from_str(&contents).with_context(|| format!("invalid TOML in {}", path.display()))?;
    Ok(Some(config.sweep.bash))
}
