//! End-to-end tests for the `cctidy` binary against real temp directories.

use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use assert_cmd::Command;
use predicates::prelude::*;

struct Fixture {
    _temp: tempfile::TempDir,
    home: PathBuf,
    project: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let home = temp.path().join("home");
        let project = temp.path().join("proj");
        fs::create_dir_all(home.join(".claude")).unwrap();
        fs::create_dir_all(project.join(".claude")).unwrap();
        Self {
            _temp: temp,
            home,
            project,
        }
    }

    fn write(&self, path: impl AsRef<Path>, contents: &str) {
        let path = path.as_ref();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cctidy").unwrap();
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .arg(&self.project);
        cmd
    }

    fn project_settings(&self) -> PathBuf {
        self.project.join(".claude/settings.local.json")
    }
}

const SETTINGS_INPUT: &str = r#"{
  "zeta": true,
  "permissions": {
    "deny": ["Read(./secret)"],
    "allow": ["Read(./src/gone.go)", "Read(./src/main.rs)", "Bash(git status)"]
  },
  "alpha": 1
}
"#;

const SETTINGS_TIDIED: &str = r#"{
  "alpha": 1,
  "permissions": {
    "allow": [
      "Bash(git status)",
      "Read(./src/main.rs)"
    ],
    "deny": [
      "Read(./secret)"
    ]
  },
  "zeta": true
}
"#;

#[test]
fn rewrites_project_settings() {
    let fixture = Fixture::new();
    fixture.write(fixture.project.join("src/main.rs"), "fn main() {}\n");
    fixture.write(fixture.project_settings(), SETTINGS_INPUT);

    fixture
        .cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("rewrote").and(predicate::str::contains("swept 1")));

    let tidied = fs::read_to_string(fixture.project_settings()).unwrap();
    assert_eq!(tidied, SETTINGS_TIDIED);

    // The original was backed up first.
    let backup = fs::read_to_string(fixture.project.join(".claude/settings.local.json.bak")).unwrap();
    assert_eq!(backup, SETTINGS_INPUT);
}

#[test]
fn cleans_root_config() {
    let fixture = Fixture::new();
    let alive = fixture.project.display().to_string();
    fixture.write(
        fixture.home.join(".claude.json"),
        &format!(r#"{{"projects": {{"{alive}": {{}}, "/definitely/gone": {{}}}}}}"#),
    );

    fixture.cmd().assert().success();

    let tidied: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixture.home.join(".claude.json")).unwrap()).unwrap();
    assert_eq!(tidied["projects"], serde_json::json!({alive: {}}));
    assert_eq!(tidied["githubRepoPaths"], serde_json::json!({}));
}

#[test]
fn check_mode_signals_pending_changes() {
    let fixture = Fixture::new();
    fixture.write(fixture.project_settings(), SETTINGS_INPUT);

    // Differences pending: exit 1, nothing written.
    fixture.cmd().arg("--check").assert().code(1);
    assert_eq!(fs::read_to_string(fixture.project_settings()).unwrap(), SETTINGS_INPUT);

    // Tidy, then check again: clean exit.
    fixture.cmd().assert().success();
    fixture.cmd().arg("--check").assert().success();
}

#[test]
fn dry_run_writes_nothing() {
    let fixture = Fixture::new();
    fixture.write(fixture.project_settings(), SETTINGS_INPUT);

    fixture
        .cmd()
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("would rewrite"));
    assert_eq!(fs::read_to_string(fixture.project_settings()).unwrap(), SETTINGS_INPUT);
    assert!(!fixture.project.join(".claude/settings.local.json.bak").exists());
}

#[test]
fn second_run_is_idempotent() {
    let fixture = Fixture::new();
    fixture.write(fixture.project_settings(), SETTINGS_INPUT);

    fixture.cmd().assert().success();
    let after_first = fs::read_to_string(fixture.project_settings()).unwrap();

    fixture
        .cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("rewrote").not());
    assert_eq!(fs::read_to_string(fixture.project_settings()).unwrap(), after_first);
}

#[test]
fn invalid_settings_json_fails_that_file() {
    let fixture = Fixture::new();
    fixture.write(fixture.project_settings(), "{broken");
    fixture.write(fixture.project.join(".claude/settings.json"), r#"{"b": 2, "a": 1}"#);

    // The broken file is reported, the other one is still tidied.
    fixture.cmd().assert().code(2).stderr(predicate::str::contains("error:"));
    assert_eq!(
        fs::read_to_string(fixture.project.join(".claude/settings.json")).unwrap(),
        "{\n  \"a\": 1,\n  \"b\": 2\n}\n"
    );
}

#[test]
fn unsafe_bash_sweeps_dead_commands() {
    let fixture = Fixture::new();
    fixture.write(
        fixture.project_settings(),
        r#"{"permissions": {"allow": ["Bash(git -C /definitely/dead/repo status)", "Bash(npm run build)"]}}"#,
    );

    fixture.cmd().arg("--unsafe-bash").assert().success();

    let tidied: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixture.project_settings()).unwrap()).unwrap();
    assert_eq!(
        tidied["permissions"]["allow"],
        serde_json::json!(["Bash(npm run build)"])
    );
}

#[test]
fn sweep_config_excludes_protect_entries() {
    let fixture = Fixture::new();
    fixture.write(
        fixture.project.join(".claude/cctidy.toml"),
        "[sweep.bash]\nenabled = true\nexclude_commands = [\"git\"]\n",
    );
    fixture.write(
        fixture.project_settings(),
        r#"{"permissions": {"allow": ["Bash(git -C /definitely/dead/repo status)", "Bash(rm /also/dead)"]}}"#,
    );

    fixture.cmd().assert().success();

    let tidied: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixture.project_settings()).unwrap()).unwrap();
    assert_eq!(
        tidied["permissions"]["allow"],
        serde_json::json!(["Bash(git -C /definitely/dead/repo status)"])
    );
}
