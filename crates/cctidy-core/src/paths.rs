//! Well-known file and directory names the pipeline reads and rewrites.
//!
//! Everything here is relative; callers join these onto the home directory,
//! the project root, or the platform config directory.

/// Root config file, relative to the home directory.
pub const ROOT_CONFIG_FILE: &str = ".claude.json";

/// Config directory under both the home directory and a project root.
pub const CLAUDE_DIR: &str = ".claude";

/// Shared settings file, relative to [CLAUDE_DIR].
pub const SETTINGS_FILE: &str = "settings.json";

/// Local (unshared) settings file, relative to [CLAUDE_DIR].
pub const SETTINGS_LOCAL_FILE: &str = "settings.local.json";

/// Agent definitions directory, relative to [CLAUDE_DIR].
pub const AGENTS_DIR: &str = "agents";

/// Skill package directory, relative to [CLAUDE_DIR].
pub const SKILLS_DIR: &str = "skills";

/// Slash-command directory, relative to [CLAUDE_DIR]. Commands share the
/// `/name` namespace with skills.
pub const COMMANDS_DIR: &str = "commands";

/// Manifest file expected inside each skill package directory.
pub const SKILL_FILE: &str = "SKILL.md";

/// Project-scope MCP server registry, relative to the project root.
pub const PROJECT_MCP_CONFIG: &str = ".mcp.json";

/// Shared sweep configuration, relative to [CLAUDE_DIR] in a project.
pub const SWEEP_CONFIG_FILE: &str = "cctidy.toml";

/// Local sweep configuration, relative to [CLAUDE_DIR] in a project.
pub const SWEEP_CONFIG_LOCAL_FILE: &str = "cctidy.local.toml";

/// Global sweep configuration, relative to the platform config directory.
pub const GLOBAL_SWEEP_CONFIG: &str = "cctidy/config.toml";
