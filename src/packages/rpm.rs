// src/packages/rpm.rs

//! RPM package manager backend

use crate::command::CommandRunner;
use crate::packages::traits::{BackendKind, PackageBackend, PackageRecord};
use crate::packages::{absolute_paths, query_output};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error};

const RPM_COMMAND: &str = "/usr/bin/rpm";

/// Location on old SUSE and Red Hat releases
const LEGACY_RPM_COMMAND: &str = "/bin/rpm";

/// rpm's message when no package owns a path
const NO_OWNER_MARKER: &str = "not owned by any package";

const LIST_FORMAT: &str = "%{NAME} | %{VERSION}-%{RELEASE} | %{ARCH}\n";
const LIST_SEPARATOR: &str = " | ";

static PRIMARY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^rpm").expect("Invalid regex pattern"));

/// rpm backend
pub struct RpmBackend {
    runner: Arc<dyn CommandRunner>,
    rpm_command: &'static str,
}

impl RpmBackend {
    /// Resolve the rpm binary and create the backend
    ///
    /// A `/bin/rpm -> /usr/bin/rpm` symlink cannot be relied on: rpm installed
    /// as a secondary manager on Ubuntu only ships `/usr/bin/rpm`. The command
    /// is never left empty, even when neither location exists.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        let rpm_command = if runner.command_exists(RPM_COMMAND) {
            RPM_COMMAND
        } else {
            LEGACY_RPM_COMMAND
        };

        Self {
            runner,
            rpm_command,
        }
    }

    /// Path of the rpm binary this backend invokes
    pub fn rpm_command(&self) -> &str {
        self.rpm_command
    }

    /// Parse `rpm -qa` output produced with `LIST_FORMAT`
    pub fn parse_package_list(output: &str) -> Vec<PackageRecord> {
        let mut packages = Vec::new();

        for line in output.lines() {
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(LIST_SEPARATOR).collect();
            match fields.as_slice() {
                [name, version, arch] => packages.push(PackageRecord::new(*name, *version, *arch)),
                _ => error!("Invalid rpm -qa output: \"{}\"", line),
            }
        }

        packages
    }

    /// Package argument for rpm, `name.arch` when the architecture is known
    fn package_spec(pkg: &PackageRecord) -> String {
        if pkg.architecture.is_empty() || pkg.architecture == "(none)" {
            pkg.name.clone()
        } else {
            format!("{}.{}", pkg.name, pkg.architecture)
        }
    }
}

impl PackageBackend for RpmBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Rpm
    }

    fn is_available(&self) -> bool {
        self.runner.command_exists(self.rpm_command)
    }

    fn is_primary(&self) -> bool {
        self.runner
            .probe(self.rpm_command, &["-qf", self.rpm_command], &PRIMARY_PATTERN)
    }

    fn owning_package(&self, path: &str) -> String {
        query_output(
            self.runner.as_ref(),
            self.rpm_command,
            &["-qf", "--queryformat", "%{NAME}", path],
            Some(NO_OWNER_MARKER),
        )
        .map(|output| output.trim().to_string())
        .unwrap_or_default()
    }

    fn installed_packages(&self) -> Vec<PackageRecord> {
        let packages = query_output(
            self.runner.as_ref(),
            self.rpm_command,
            &["-qa", "--queryformat", LIST_FORMAT],
            None,
        )
        .map(|output| Self::parse_package_list(&output))
        .unwrap_or_default();

        debug!("rpm: {} installed packages", packages.len());
        packages
    }

    fn file_list(&self, pkg: &PackageRecord) -> Vec<String> {
        let spec = Self::package_spec(pkg);
        query_output(self.runner.as_ref(), self.rpm_command, &["-ql", spec.as_str()], None)
            .map(|output| absolute_paths(&output))
            .unwrap_or_default()
    }
}
