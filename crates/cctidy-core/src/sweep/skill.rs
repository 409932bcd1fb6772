//! Skill sweeper (safe tier).
//!
//! The skill name set also contains command names; both are invoked through
//! the same `/name` namespace.

use super::{
    Decision,
    SweepContext,
};

pub(super) fn evaluate(ctx: &SweepContext, specifier: &str) -> Decision {
    // `plugin:skill` references are owned by the plugin sweeper.
    if specifier.contains(':') {
        return Decision::Keep;
    }
    if ctx.names.skills.is_empty() {
        return Decision::Keep;
    }
    // Only the first token names the skill; `review *` is kept when
    // `review` exists.
    let name = specifier.split_whitespace().next().unwrap_or(specifier);
    if ctx.names.skills.contains(name) {
        Decision::Keep
    } else {
        Decision::Sweep
    }
}
