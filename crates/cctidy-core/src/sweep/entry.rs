//! Classification of permission-entry strings.
//!
//! Entries are parsed once by regex into a small sum type; the dispatcher
//! routes on the tag. Anything that matches neither recognized shape is
//! [ToolEntry::Unrecognized] and always kept.

use std::sync::LazyLock;

use regex::Regex;

/// `Tool(specifier)` with an identifier-shaped tool name.
static STANDARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9_]*)\((.*)\)$").expect("standard entry regex is valid"));

const MCP_PREFIX: &str = "mcp__";
const PLUGIN_PREFIX: &str = "plugin_";

/// A single `permissions.allow` / `permissions.ask` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolEntry<'a> {
    /// `Tool(specifier)`.
    Standard { tool: ToolName<'a>, specifier: &'a str },
    /// `mcp__…`, covering both plain MCP servers and the plugin form.
    Mcp { raw: &'a str },
    /// Bare tokens (`"Read"`, `"Bash"`) and anything else.
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName<'a> {
    Read,
    Edit,
    Write,
    Bash,
    Task,
    Skill,
    Mcp,
    Other(&'a str),
}

impl<'a> ToolName<'a> {
    fn parse(name: &'a str) -> Self {
        match name {
            "Read" => Self::Read,
            "Edit" => Self::Edit,
            "Write" => Self::Write,
            "Bash" => Self::Bash,
            "Task" => Self::Task,
            "Skill" => Self::Skill,
            "Mcp" => Self::Mcp,
            other => Self::Other(other),
        }
    }
}

/// Classifies one raw entry string.
///
/// The `mcp__` check runs first: `mcp__server(args)` would otherwise also
/// match the standard shape.
pub fn parse(raw: &str) -> ToolEntry<'_> {
    if raw.starts_with(MCP_PREFIX) {
        return ToolEntry::Mcp { raw };
    }
    if let Some(caps) = STANDARD.captures(raw) {
        let tool = caps.get(1).expect("group 1 always participates").as_str();
        let specifier = caps.get(2).expect("group 2 always participates").as_str();
        return ToolEntry::Standard {
            tool: ToolName::parse(tool),
            specifier,
        };
    }
    ToolEntry::Unrecognized
}

/// The server segment of an `mcp__…` entry: the text after `mcp__` up to the
/// next `__`, or the entire remainder.
///
/// `mcp__server` (bare) is valid. `mcp____tool` yields an empty name; the
/// MCP sweeper keeps such entries with a warning.
pub fn mcp_server_name(raw: &str) -> &str {
    let remainder = raw.strip_prefix(MCP_PREFIX).unwrap_or(raw);
    match remainder.find("__") {
        Some(idx) => &remainder[..idx],
        None => remainder,
    }
}

/// Whether an `mcp__…` entry uses the plugin form (`mcp__plugin_…`).
///
/// Plugin-form entries are routed to the plugin sweeper even when no plugin
/// name can be extracted from them.
pub fn is_plugin_form(raw: &str) -> bool {
    raw.strip_prefix(MCP_PREFIX)
        .is_some_and(|remainder| remainder.starts_with(PLUGIN_PREFIX))
}

/// The plugin name referenced by an entry, if any:
///
/// - for `mcp__plugin_<name>_<server>...`, the token between `plugin_` and
///   the first subsequent `_`. Plugin names containing underscores therefore
///   truncate at the first one; that matches the entry format itself.
/// - for `Skill(...)`, `Task(...)`, or `Mcp(...)` whose specifier's first
///   space-delimited segment contains `:`, the text before the `:`.
pub fn plugin_name<'a>(entry: &ToolEntry<'a>) -> Option<&'a str> {
    match entry {
        ToolEntry::Mcp { raw } => {
            let rest = raw.strip_prefix(MCP_PREFIX)?.strip_prefix(PLUGIN_PREFIX)?;
            let name = &rest[..rest.find('_')?];
            (!name.is_empty()).then_some(name)
        },
        ToolEntry::Standard {
            tool: ToolName::Skill | ToolName::Task | ToolName::Mcp,
            specifier,
        } => {
            let head = specifier.split(' ').next().unwrap_or(specifier);
            let (name, _) = head.split_once(':')?;
            (!name.is_empty()).then_some(name)
        },
        ToolEntry::Standard { .. } | ToolEntry::Unrecognized => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            parse("Read(./src/a.go)"),
            ToolEntry::Standard {
                tool: ToolName::Read,
                specifier: "./src/a.go",
            }
        );
        assert_eq!(
            parse("WebFetch(domain:example.com)"),
            ToolEntry::Standard {
                tool: ToolName::Other("WebFetch"),
                specifier: "domain:example.com",
            }
        );
        assert_eq!(parse("Bash()"), ToolEntry::Standard {
            tool: ToolName::Bash,
            specifier: "",
        });
        assert_eq!(parse("mcp__github__search"), ToolEntry::Mcp {
            raw: "mcp__github__search",
        });
        // mcp__ wins over the standard shape.
        assert_eq!(parse("mcp__github(x)"), ToolEntry::Mcp { raw: "mcp__github(x)" });

        for raw in ["Read", "Bash", "", "1Tool(x)", "Tool(x", "Tool x)"] {
            assert_eq!(parse(raw), ToolEntry::Unrecognized, "input: {raw:?}");
        }
    }

    #[test]
    fn test_mcp_server_name() {
        assert_eq!(mcp_server_name("mcp__github__search_code"), "github");
        assert_eq!(mcp_server_name("mcp__github"), "github");
        assert_eq!(mcp_server_name("mcp____tool"), "");
        assert_eq!(mcp_server_name("mcp__"), "");
    }

    #[test]
    fn test_plugin_name() {
        let cases = [
            ("mcp__plugin_github_github__search_code", Some("github")),
            ("mcp__plugin_my_plugin_server", Some("my")),
            ("mcp__plugin_orphan", None),
            ("mcp__plugin__server", None),
            ("Skill(github:review)", Some("github")),
            ("Task(linter:lint-agent)", Some("linter")),
            ("Skill(github:review extra args)", Some("github")),
            ("Skill(review)", None),
            ("Skill(:broken)", None),
            ("Skill(review after:colon)", None),
            ("Bash(x:y)", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(plugin_name(&parse(raw)), expected, "input: {raw:?}");
        }
    }

    #[test]
    fn test_is_plugin_form() {
        assert!(is_plugin_form("mcp__plugin_github_github"));
        assert!(is_plugin_form("mcp__plugin_orphan"));
        assert!(!is_plugin_form("mcp__github__search"));
    }
}
