//! MCP sweeper (safe tier).

use super::entry;
use super::{
    Decision,
    SweepContext,
};

pub(super) fn evaluate(ctx: &SweepContext, raw: &str) -> Decision {
    let server = entry::mcp_server_name(raw);
    if server.is_empty() {
        // `mcp__` followed directly by `__` names no server; sweeping it
        // would delete an entry we never understood.
        return Decision::Warn(format!("kept {raw:?}: empty MCP server name"));
    }
    if ctx.mcp_servers.contains(ctx.scope, server) {
        Decision::Keep
    } else {
        Decision::Sweep
    }
}
