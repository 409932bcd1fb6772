//! Bash sweeper (unsafe tier).
//!
//! Inactive unless opted into via config or the runtime unsafe switch. When
//! active it extracts path candidates from the command line, applies the
//! configured excluders, and sweeps only when every candidate is definitely
//! absent. No candidates means no evidence: the entry is kept.

use std::path::PathBuf;

use super::{
    Decision,
    SweepContext,
};
use crate::config::BashSweepConfig;
use crate::extract;
use crate::resolve::resolve_specifier;
use crate::util::error::Error;

pub(super) async fn evaluate(ctx: &SweepContext, specifier: &str) -> Result<Decision, Error> {
    if !ctx.bash.enabled {
        return Ok(Decision::Keep);
    }

    let absolute = extract::absolute_candidates(specifier);
    if is_excluded(&ctx.bash, specifier, &absolute) {
        return Ok(Decision::Keep);
    }

    let mut candidates = absolute;
    for relative in extract::relative_candidates(specifier) {
        // Unresolvable candidates drop out of the evaluation entirely.
        if let Some(path) = resolve_specifier(relative, &ctx.dirs) {
            if !candidates.contains(&path) {
                candidates.push(path);
            }
        }
    }

    if candidates.is_empty() {
        return Ok(Decision::Keep);
    }
    for path in &candidates {
        if ctx.checker.exists(&ctx.token, path).await? {
            return Ok(Decision::Keep);
        }
    }
    Ok(Decision::Sweep)
}

fn is_excluded(config: &BashSweepConfig, specifier: &str, absolute: &[PathBuf]) -> bool {
    if config.exclude_entries.iter().any(|entry| entry == specifier) {
        return true;
    }
    if let Some(command) = specifier.split_whitespace().next() {
        if config.exclude_commands.iter().any(|excluded| excluded == command) {
            return true;
        }
    }
    // Prefix check uses directory-boundary semantics: /opt/tools excludes
    // /opt/tools/bin but not /opt/toolsuite.
    absolute
        .iter()
        .any(|path| config.exclude_paths.iter().any(|prefix| path.starts_with(prefix)))
}
