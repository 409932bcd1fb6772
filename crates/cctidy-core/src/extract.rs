//! Heuristic extraction of path candidates from Bash permission specifiers.
//!
//! These are regex heuristics and deliberately conservative: quoted paths
//! with spaces, escape sequences, `$VAR` substitutions, and shell constructs
//! in general are not understood. The Bash sweeper keeps an entry when no
//! candidate could be extracted, so a missed path never causes a deletion.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::resolve::normalize;

/// An absolute candidate is `/` followed by path characters. The leading `/`
/// must sit at the start of the string or after a character that cannot
/// continue an identifier or a `~`/`.` prefix, so `~/foo` is not also
/// captured as `/foo`.
static ABSOLUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^A-Za-z0-9_.~])(/[A-Za-z0-9_./-]+)").expect("absolute path regex is valid"));

/// A relative candidate is `./`, `../`, or `~/` plus path characters,
/// preceded by the start of the string, a space, or `=`. Bare relative paths
/// (`src/file`) are intentionally not matched; the false-positive rate on
/// general shell tokens is too high.
static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[ =])((?:\.\./|\./|~/)[A-Za-z0-9_./-]+)").expect("relative path regex is valid")
});

/// Extracts absolute path candidates from a Bash specifier, normalized and
/// de-duplicated in first-seen order.
pub fn absolute_candidates(specifier: &str) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    for caps in ABSOLUTE.captures_iter(specifier) {
        let normalized = normalize(std::path::Path::new(&caps[1]));
        if normalized.as_os_str().is_empty() || normalized == PathBuf::from("/") {
            continue;
        }
        if !candidates.contains(&normalized) {
            candidates.push(normalized);
        }
    }
    candidates
}

/// Extracts relative path candidates (`./x`, `../x`, `~/x`) from a Bash
/// specifier, unresolved and de-duplicated in first-seen order.
pub fn relative_candidates(specifier: &str) -> Vec<&str> {
    let mut candidates: Vec<&str> = Vec::new();
    for caps in RELATIVE.captures_iter(specifier) {
        let candidate = caps.get(1).expect("group 1 always participates").as_str();
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn absolute(specifier: &str) -> Vec<String> {
        absolute_candidates(specifier)
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_absolute_candidates() {
        let tests: &[(&str, &[&str])] = &[
            ("cp /alive/src /dead/dst", &["/alive/src", "/dead/dst"]),
            ("git -C /repo/path status", &["/repo/path"]),
            ("/usr/bin/tool --flag", &["/usr/bin/tool"]),
            ("echo a/b", &[]),
            ("~/not/absolute", &[]),
            ("ls /a/../b", &["/b"]),
            ("cat /.", &[]),
            ("npm run *", &[]),
            ("cmd --path=/opt/x", &["/opt/x"]),
        ];

        for (specifier, expected) in tests {
            assert_eq!(
                absolute(specifier),
                *expected,
                "unexpected absolute candidates for {specifier:?}"
            );
        }
    }

    #[test]
    fn test_relative_candidates() {
        let tests: &[(&str, &[&str])] = &[
            ("cat ./a.txt", &["./a.txt"]),
            ("diff ../x ./y", &["../x", "./y"]),
            ("ls ~/docs/notes", &["~/docs/notes"]),
            ("cmd --file=./conf.toml", &["./conf.toml"]),
            // No boundary before the prefix.
            ("cmd x./y", &[]),
            // Bare relative paths are not candidates.
            ("make src/main.o", &[]),
        ];

        for (specifier, expected) in tests {
            assert_eq!(
                relative_candidates(specifier),
                *expected,
                "unexpected relative candidates for {specifier:?}"
            );
        }
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(absolute("cp /a /a"), ["/a"]);
        assert_eq!(relative_candidates("cp ./a ./a"), ["./a"]);
    }
}
