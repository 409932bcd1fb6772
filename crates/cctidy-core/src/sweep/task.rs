//! Task sweeper (safe tier).

use super::{
    Decision,
    SweepContext,
};

/// Agent names the host application always provides, independent of any
/// agent directory.
const BUILT_IN_AGENTS: &[&str] = &[
    "Bash",
    "Explore",
    "Plan",
    "claude-code-guide",
    "general-purpose",
    "statusline-setup",
];

pub(super) fn evaluate(ctx: &SweepContext, specifier: &str) -> Decision {
    if BUILT_IN_AGENTS.contains(&specifier) {
        return Decision::Keep;
    }
    // `plugin:agent` references are owned by the plugin sweeper.
    if specifier.contains(':') {
        return Decision::Keep;
    }
    // An empty set means no context to judge against, not "no agents".
    if ctx.names.agents.is_empty() {
        return Decision::Keep;
    }
    if ctx.names.agents.contains(specifier) {
        Decision::Keep
    } else {
        Decision::Sweep
    }
}
