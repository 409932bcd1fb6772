//! Plugin sweeper (safe tier).
//!
//! Covers both entry shapes that reference a marketplace plugin:
//! `mcp__plugin_<name>_<server>…` and `Skill(<name>:…)` / `Task(<name>:…)` /
//! `Mcp(<name>:…)`.

use super::entry::{
    self,
    ToolEntry,
};
use super::{
    Decision,
    SweepContext,
};

pub(super) fn evaluate(ctx: &SweepContext, entry: &ToolEntry<'_>) -> Decision {
    // No settings file declared enabledPlugins: the sweeper is inactive.
    let Some(plugins) = &ctx.enabled_plugins else {
        return Decision::Keep;
    };
    // A plugin-form entry with no extractable name gives no evidence either
    // way.
    let Some(name) = entry::plugin_name(entry) else {
        return Decision::Keep;
    };
    if plugins.is_enabled(name) {
        Decision::Keep
    } else {
        Decision::Sweep
    }
}
