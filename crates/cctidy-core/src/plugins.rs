//! Loading of the `enabledPlugins` maps from settings files.
//!
//! Keys have the form `name@marketplace`; only the `name` prefix is
//! retained. The same plugin may appear under several marketplaces, so the
//! per-file maps are OR-merged: once a name is enabled anywhere it stays
//! enabled.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::util::error::Error;

/// The merged plugin-enablement map.
///
/// `None` at the call sites (no settings file contained `enabledPlugins`)
/// means the plugin sweeper is inactive and keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledPlugins {
    plugins: HashMap<String, bool>,
}

impl EnabledPlugins {
    /// Whether entries referencing `name` should be kept.
    ///
    /// Unknown plugins are enabled: sweeping is only justified by an
    /// explicit `false` that no marketplace overrides.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.plugins.get(name).copied().unwrap_or(true)
    }

    fn merge_key(&mut self, key: &str, enabled: bool) {
        // `name@marketplace`; keys without `@` or with an empty name are not
        // plugin references.
        let Some((name, _marketplace)) = key.split_once('@') else {
            return;
        };
        if name.is_empty() {
            return;
        }
        let entry = self.plugins.entry(name.to_string()).or_insert(false);
        *entry = *entry || enabled;
    }

    #[cfg(test)]
    pub(crate) fn for_tests(entries: impl IntoIterator<Item = (&'static str, bool)>) -> Self {
        let mut merged = Self::default();
        for (key, enabled) in entries {
            merged.merge_key(key, enabled);
        }
        merged
    }
}

/// Reads `enabledPlugins` from every given settings file and merges them.
///
/// Files that are missing, unparseable, or lack the key are ignored. Returns
/// `None` iff no file contained an `enabledPlugins` map.
pub async fn load_enabled_plugins(
    token: &CancellationToken,
    settings_files: &[&Path],
) -> Result<Option<EnabledPlugins>, Error> {
    let mut merged: Option<EnabledPlugins> = None;

    for path in settings_files {
        if token.is_cancelled() {
            return Err(Error::Interrupted);
        }
        let Ok(contents) = tokio::fs::read_to_string(path).await else {
            continue;
        };
        let settings: Value = match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(?e, "skipping unparseable settings file {:?}", path);
                continue;
            },
        };
        let Some(enabled_plugins) = settings.get("enabledPlugins").and_then(Value::as_object) else {
            continue;
        };

        let merged = merged.get_or_insert_with(EnabledPlugins::default);
        for (key, value) in enabled_plugins {
            if let Value::Bool(enabled) = value {
                merged.merge_key(key, *enabled);
            }
        }
    }

    Ok(merged)
}
