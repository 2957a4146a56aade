// src/packages/arch.rs

//! Arch Linux package manager backend
//!
//! Talks to pacman. pacman reports no architecture in its installed list and
//! this backend does not provide file lists.

use crate::command::CommandRunner;
use crate::packages::query_output;
use crate::packages::traits::{BackendKind, PackageBackend, PackageRecord};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error};

const PACMAN_COMMAND: &str = "/usr/bin/pacman";

/// pacman's message when no package owns a path
const NO_OWNER_MARKER: &str = "No package owns";

const OWNED_BY: &str = "is owned by ";

static PRIMARY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"is owned by pacman").expect("Invalid regex pattern"));

/// pacman backend
pub struct PacmanBackend {
    runner: Arc<dyn CommandRunner>,
}

impl PacmanBackend {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Extract the package name from `pacman -Qo` output
    ///
    /// Sample output: `/usr/bin/pacman is owned by pacman 5.1.1-3`.
    /// The path may contain blanks, so everything up to the last
    /// "is owned by " is dropped before taking the first word.
    pub fn parse_owner(output: &str) -> String {
        let rest = match output.rfind(OWNED_BY) {
            Some(pos) => &output[pos + OWNED_BY.len()..],
            None => output,
        };

        rest.split_whitespace().next().unwrap_or_default().to_string()
    }

    /// Parse `pacman -Q` output: one `name version` line per package
    pub fn parse_package_list(output: &str) -> Vec<PackageRecord> {
        let mut packages = Vec::new();

        for line in output.lines() {
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [name, version] => packages.push(PackageRecord::new(*name, *version, "")),
                _ => error!("Invalid pacman -Q output: \"{}\"", line),
            }
        }

        packages
    }
}

impl PackageBackend for PacmanBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Pacman
    }

    fn is_available(&self) -> bool {
        self.runner.command_exists(PACMAN_COMMAND)
    }

    fn is_primary(&self) -> bool {
        self.runner
            .probe(PACMAN_COMMAND, &["-Qo", PACMAN_COMMAND], &PRIMARY_PATTERN)
    }

    fn owning_package(&self, path: &str) -> String {
        query_output(self.runner.as_ref(), PACMAN_COMMAND, &["-Qo", path], Some(NO_OWNER_MARKER))
            .map(|output| Self::parse_owner(&output))
            .unwrap_or_default()
    }

    fn installed_packages(&self) -> Vec<PackageRecord> {
        let packages = query_output(self.runner.as_ref(), PACMAN_COMMAND, &["-Q"], None)
            .map(|output| Self::parse_package_list(&output))
            .unwrap_or_default();

        debug!("pacman: {} installed packages", packages.len());
        packages
    }
}
