//! Path cleaning for the root config file (`~/.claude.json`).
//!
//! The root file tracks per-project state under `projects` (keyed by project
//! path) and checkout locations under `githubRepoPaths`. Both accumulate
//! entries for directories that have long been deleted; cleaning drops
//! those. The sweeper pipeline does not run on this file.

use std::path::Path;

use serde_json::{
    Map,
    Value,
};
use tokio_util::sync::CancellationToken;

use crate::util::check::PathChecker;
use crate::util::error::Error;

/// Removes dead paths from `projects` and `githubRepoPaths`, creating both
/// keys as `{}` when absent.
///
/// - `projects`: each key is itself a path; keys that do not exist are
///   deleted.
/// - `githubRepoPaths`: maps repo ids to arrays of checkout paths; dead
///   paths are removed, and a repo whose array ends up empty is deleted
///   entirely.
pub async fn clean_root_config(
    checker: &dyn PathChecker,
    token: &CancellationToken,
    root: &mut Value,
) -> Result<(), Error> {
    let Some(object) = root.as_object_mut() else {
        return Ok(());
    };

    clean_projects(checker, token, object).await?;
    clean_github_repo_paths(checker, token, object).await?;

    Ok(())
}

async fn clean_projects(
    checker: &dyn PathChecker,
    token: &CancellationToken,
    root: &mut Map<String, Value>,
) -> Result<(), Error> {
    let Some(projects) = ensure_object(root, "projects") else {
        return Ok(());
    };

    let keys: Vec<String> = projects.keys().cloned().collect();
    for key in keys {
        if !checker.exists(token, Path::new(&key)).await? {
            projects.remove(&key);
        }
    }
    Ok(())
}

async fn clean_github_repo_paths(
    checker: &dyn PathChecker,
    token: &CancellationToken,
    root: &mut Map<String, Value>,
) -> Result<(), Error> {
    let Some(repos) = ensure_object(root, "githubRepoPaths") else {
        return Ok(());
    };

    let keys: Vec<String> = repos.keys().cloned().collect();
    for key in keys {
        let Some(Value::Array(paths)) = repos.get_mut(&key) else {
            continue;
        };

        let mut kept = Vec::with_capacity(paths.len());
        for value in paths.drain(..) {
            let dead = match value.as_str() {
                Some(path) => !checker.exists(token, Path::new(path)).await?,
                None => false,
            };
            if !dead {
                kept.push(value);
            }
        }
        *paths = kept;

        if paths.is_empty() {
            repos.remove(&key);
        }
    }
    Ok(())
}

/// Returns the object under `key`, inserting `{}` when the key is absent.
/// A present non-object value is left alone.
fn ensure_object<'a>(root: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Map<String, Value>> {
    root.entry(key).or_insert_with(|| Value::Object(Map::new())).as_object_mut()
}
