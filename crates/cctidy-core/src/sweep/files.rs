//! Read/Edit sweeper (safe tier).
//!
//! Write, Grep, Glob, WebFetch, WebSearch, and every other recognized tool
//! are never swept: their specifiers either do not name filesystem state or
//! name things that are legitimately created later.

use super::{
    Decision,
    SweepContext,
};
use crate::resolve::resolve_specifier;
use crate::util::error::Error;

/// Glob metacharacters. A specifier carrying any of these describes a
/// pattern, not a path, and is never swept.
const GLOB_CHARS: [char; 3] = ['*', '?', '['];

pub(super) async fn evaluate(ctx: &SweepContext, specifier: &str) -> Result<Decision, Error> {
    if specifier.contains(GLOB_CHARS) {
        return Ok(Decision::Keep);
    }
    let Some(path) = resolve_specifier(specifier, &ctx.dirs) else {
        return Ok(Decision::Keep);
    };
    Ok(if ctx.checker.exists(&ctx.token, &path).await? {
        Decision::Keep
    } else {
        Decision::Sweep
    })
}
