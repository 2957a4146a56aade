// src/packages/mod.rs

//! Package manager backends
//!
//! One module per supported manager (dpkg, rpm, pacman). Each backend
//! implements the `PackageBackend` trait and parses its manager's CLI output.

pub mod arch;
pub mod deb;
pub mod rpm;
pub mod traits;

pub use traits::{BackendKind, PackageBackend, PackageRecord};

use crate::command::{CommandRunner, render_command};
use std::sync::Arc;
use tracing::debug;

/// Construct the backend for `kind`
///
/// Adding a package manager means adding a `BackendKind` variant and one
/// arm here.
pub fn create_backend(kind: BackendKind, runner: Arc<dyn CommandRunner>) -> Box<dyn PackageBackend> {
    match kind {
        BackendKind::Dpkg => Box::new(deb::DpkgBackend::new(runner)),
        BackendKind::Rpm => Box::new(rpm::RpmBackend::new(runner)),
        BackendKind::Pacman => Box::new(arch::PacmanBackend::new(runner)),
    }
}

/// Run a query command and return its output if it succeeded
///
/// A spawn failure, a non-zero exit code or output containing
/// `failure_marker` yields `None`. Markers are the managers' own English
/// messages, so a localized or reworded tool output slips through here.
pub(crate) fn query_output(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    failure_marker: Option<&str>,
) -> Option<String> {
    match runner.run(program, args) {
        Ok(out) if !out.success() => {
            debug!(
                "`{}` exited with code {}",
                render_command(program, args),
                out.exit_code
            );
            None
        }
        Ok(out) => match failure_marker {
            Some(marker) if out.output.contains(marker) => {
                debug!("`{}`: {}", render_command(program, args), marker);
                None
            }
            _ => Some(out.output),
        },
        Err(e) => {
            debug!("{}", e);
            None
        }
    }
}

/// Keep the absolute paths of a file listing, one per line
pub(crate) fn absolute_paths(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.starts_with('/'))
        .map(|line| line.to_string())
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedRunner;
    use super::*;

    #[test]
    fn test_create_backend_matches_kind() {
        let runner: Arc<dyn CommandRunner> = Arc::new(ScriptedRunner::new());
        for kind in BackendKind::PROBE_ORDER {
            let backend = create_backend(kind, runner.clone());
            assert_eq!(backend.kind(), kind);
            assert_eq!(backend.name(), kind.as_str());
        }
    }

    #[test]
    fn test_query_output_rejects_failures() {
        let runner = ScriptedRunner::new()
            .respond("tool ok", "fine\n", 0)
            .respond("tool bad", "fine\n", 2)
            .respond("tool marked", "tool: nothing here\n", 0);

        assert_eq!(query_output(&runner, "tool", &["ok"], Some("nothing here")).as_deref(), Some("fine\n"));
        assert_eq!(query_output(&runner, "tool", &["bad"], None), None);
        assert_eq!(query_output(&runner, "tool", &["marked"], Some("nothing here")), None);
        assert_eq!(query_output(&runner, "tool", &["missing"], None), None);
    }

    #[test]
    fn test_absolute_paths() {
        let output = "/usr\n(contains no files)\n/usr/bin/ls\n\ndiverted by foo\n";
        assert_eq!(absolute_paths(output), vec!["/usr", "/usr/bin/ls"]);
    }
}
