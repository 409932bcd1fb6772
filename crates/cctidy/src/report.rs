//! Per-file progress reporting on stderr.

use std::path::Path;

use cctidy_core::SweepResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite files in place.
    Write,
    /// Report what would change, write nothing.
    DryRun,
    /// Write nothing, stay silent; differences surface via the exit code.
    Check,
}

#[derive(Debug)]
pub struct Reporter {
    mode: Mode,
    verbosity: u8,
}

impl Reporter {
    pub fn new(mode: Mode, verbosity: u8) -> Self {
        Self { mode, verbosity }
    }

    pub fn file_changed(&self, path: &Path, result: Option<&SweepResult>) {
        if self.mode == Mode::Check {
            return;
        }
        let verb = match self.mode {
            Mode::DryRun => "would rewrite",
            Mode::Write | Mode::Check => "rewrote",
        };
        match result {
            Some(result) if result.swept_total() > 0 => {
                eprintln!("{verb} {} (swept {})", path.display(), result.swept_total());
            },
            _ => eprintln!("{verb} {}", path.display()),
        }
        if let Some(result) = result {
            self.details(result);
        }
    }

    pub fn file_unchanged(&self, path: &Path, result: Option<&SweepResult>) {
        if self.verbosity >= 1 && self.mode != Mode::Check {
            eprintln!("unchanged {}", path.display());
        }
        if let Some(result) = result {
            self.details(result);
        }
    }

    pub fn file_failed(&self, path: &Path, error: &cctidy_core::Error) {
        eprintln!("error: {}: {error}", path.display());
    }

    fn details(&self, result: &SweepResult) {
        if self.mode == Mode::Check {
            return;
        }
        if self.verbosity >= 1 && result.swept_total() > 0 {
            eprintln!("  swept allow: {}, ask: {}", result.swept_allow, result.swept_ask);
        }
        if self.verbosity >= 2 {
            for warn in &result.warns {
                eprintln!("  warning: {warn}");
            }
        }
    }
}
