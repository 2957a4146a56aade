// src/packages/deb.rs

//! Debian package manager backend
//!
//! Talks to dpkg and dpkg-query on Debian, Ubuntu and derivatives.

use crate::command::CommandRunner;
use crate::packages::traits::{BackendKind, PackageBackend, PackageRecord};
use crate::packages::{absolute_paths, query_output};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error};

const DPKG_COMMAND: &str = "/usr/bin/dpkg";
const DPKG_QUERY_COMMAND: &str = "/usr/bin/dpkg-query";

/// dpkg's message (on stderr) when no package owns a path
const NO_OWNER_MARKER: &str = "no path found matching pattern";

/// One `name architecture version` line per installed package
const SHOW_FORMAT: &str = "--showformat=${Package} ${Architecture} ${Version}\n";

static PRIMARY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^dpkg:").expect("Invalid regex pattern"));

/// dpkg backend
pub struct DpkgBackend {
    runner: Arc<dyn CommandRunner>,
}

impl DpkgBackend {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Extract the package name from `dpkg -S` output
    ///
    /// Output looks like `coreutils: /bin/ls`, or `libc6:amd64: /lib/...`
    /// for multiarch packages; the name is everything before the first colon.
    fn parse_owner(output: &str) -> String {
        output.split(':').next().unwrap_or_default().trim().to_string()
    }

    /// Parse `dpkg-query --show` output produced with `SHOW_FORMAT`
    ///
    /// Lines that do not split into exactly three fields are logged and
    /// skipped.
    pub fn parse_package_list(output: &str) -> Vec<PackageRecord> {
        let mut packages = Vec::new();

        for line in output.lines() {
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(' ').collect();
            match fields.as_slice() {
                [name, arch, version] => packages.push(PackageRecord::new(*name, *version, *arch)),
                _ => error!("Invalid dpkg-query output: \"{}\"", line),
            }
        }

        packages
    }

    /// Package argument for dpkg, arch-qualified for multiarch packages
    fn package_spec(pkg: &PackageRecord) -> String {
        if pkg.architecture.is_empty() || pkg.architecture == "all" {
            pkg.name.clone()
        } else {
            format!("{}:{}", pkg.name, pkg.architecture)
        }
    }
}

impl PackageBackend for DpkgBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Dpkg
    }

    fn is_available(&self) -> bool {
        self.runner.command_exists(DPKG_COMMAND)
    }

    fn is_primary(&self) -> bool {
        self.runner
            .probe(DPKG_COMMAND, &["-S", DPKG_COMMAND], &PRIMARY_PATTERN)
    }

    fn owning_package(&self, path: &str) -> String {
        query_output(self.runner.as_ref(), DPKG_COMMAND, &["-S", path], Some(NO_OWNER_MARKER))
            .map(|output| Self::parse_owner(&output))
            .unwrap_or_default()
    }

    fn installed_packages(&self) -> Vec<PackageRecord> {
        let packages = query_output(self.runner.as_ref(), DPKG_QUERY_COMMAND, &["--show", SHOW_FORMAT], None)
            .map(|output| Self::parse_package_list(&output))
            .unwrap_or_default();

        debug!("dpkg: {} installed packages", packages.len());
        packages
    }

    fn file_list(&self, pkg: &PackageRecord) -> Vec<String> {
        let spec = Self::package_spec(pkg);
        query_output(self.runner.as_ref(), DPKG_COMMAND, &["-L", spec.as_str()], None)
            .map(|output| {
                absolute_paths(&output)
                    .into_iter()
                    .filter(|path| path != "/.")
                    .collect()
            })
            .unwrap_or_default()
    }
}
