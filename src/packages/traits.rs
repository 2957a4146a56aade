// src/packages/traits.rs

//! Common traits and types for package manager backends

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One installed package as reported by a package manager
///
/// Identity is `(name, architecture)`; the version is descriptive only and
/// takes no part in equality or hashing.
#[derive(Debug, Clone, Serialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    /// Empty when the backend does not report architectures
    pub architecture: String,
}

impl PackageRecord {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        architecture: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            architecture: architecture.into(),
        }
    }
}

impl PartialEq for PackageRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.architecture == other.architecture
    }
}

impl Eq for PackageRecord {}

impl Hash for PackageRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.architecture.hash(state);
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.architecture.is_empty() {
            write!(f, "{}-{}", self.name, self.version)
        } else {
            write!(f, "{}-{}.{}", self.name, self.version, self.architecture)
        }
    }
}

/// The closed set of supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Dpkg,
    Rpm,
    Pacman,
}

impl BackendKind {
    /// Order in which the registry probes the host
    pub const PROBE_ORDER: [BackendKind; 3] =
        [BackendKind::Dpkg, BackendKind::Rpm, BackendKind::Pacman];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Dpkg => "dpkg",
            BackendKind::Rpm => "rpm",
            BackendKind::Pacman => "pacman",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common interface for all package manager backends (dpkg, rpm, pacman)
///
/// None of these methods fail: a missing binary, a non-zero exit or a
/// manager's own "not found" message all produce an empty result.
pub trait PackageBackend: Send + Sync {
    /// Which package manager this is
    fn kind(&self) -> BackendKind;

    /// Name used in log messages and diagnostics
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    /// Whether the manager's executable exists on this host
    fn is_available(&self) -> bool;

    /// Whether this manager owns its own executable, i.e. controls the OS
    fn is_primary(&self) -> bool;

    /// Name of the package owning `path`, empty if none
    fn owning_package(&self, path: &str) -> String;

    /// All installed packages
    fn installed_packages(&self) -> Vec<PackageRecord> {
        Vec::new()
    }

    /// Files owned by `pkg`
    fn file_list(&self, _pkg: &PackageRecord) -> Vec<String> {
        Vec::new()
    }
}
