// src/registry.rs

//! Package manager detection
//!
//! Probes every known backend once and orders the ones present on this
//! host: the primary manager (the one that installed the OS itself) first,
//! then managers that are merely installed.

use crate::command::{CommandRunner, SystemRunner};
use crate::packages::{BackendKind, PackageBackend, create_backend};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// How a detected backend relates to the host system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendRole {
    /// Owns its own executable, so it manages the OS core packages
    Primary,
    /// Installed, but not in charge of the system
    Secondary,
}

impl fmt::Display for BackendRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendRole::Primary => f.write_str("primary"),
            BackendRole::Secondary => f.write_str("secondary"),
        }
    }
}

/// A backend admitted to the registry
pub struct RegisteredBackend {
    pub backend: Box<dyn PackageBackend>,
    pub role: BackendRole,
}

/// Ordered list of the package managers active on this host
///
/// All primary backends come before all secondary ones; within each group
/// the probe order is kept.
#[derive(Default)]
pub struct Registry {
    entries: Vec<RegisteredBackend>,
}

impl Registry {
    /// Probe the host with real commands
    pub fn detect() -> Self {
        Self::detect_with(Arc::new(SystemRunner))
    }

    /// Probe every `BackendKind` through `runner`
    pub fn detect_with(runner: Arc<dyn CommandRunner>) -> Self {
        info!("Checking available supported package managers...");

        let backends = BackendKind::PROBE_ORDER
            .iter()
            .map(|kind| create_backend(*kind, runner.clone()))
            .collect();

        Self::classify(backends)
    }

    /// Classify already constructed backends, keeping their order
    ///
    /// Backends that are neither primary nor available are dropped.
    pub fn classify(backends: Vec<Box<dyn PackageBackend>>) -> Self {
        let mut primary = Vec::new();
        let mut secondary = Vec::new();

        for backend in backends {
            if backend.is_primary() {
                info!("Found primary package manager {}", backend.name());
                primary.push(RegisteredBackend {
                    backend,
                    role: BackendRole::Primary,
                });
            } else if backend.is_available() {
                info!("Found secondary package manager {}", backend.name());
                secondary.push(RegisteredBackend {
                    backend,
                    role: BackendRole::Secondary,
                });
            } else {
                debug!("Package manager {} not available", backend.name());
            }
        }

        primary.append(&mut secondary);
        let registry = Self { entries: primary };

        if registry.is_empty() {
            info!("No supported package manager found.");
        } else {
            info!("Found {}", registry.names().join(", "));
        }

        registry
    }

    /// Registry with no backends; every query comes back empty
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[RegisteredBackend] {
        &self.entries
    }

    /// Backends in query order
    pub fn backends(&self) -> impl Iterator<Item = &dyn PackageBackend> {
        self.entries.iter().map(|entry| entry.backend.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.backends().map(|backend| backend.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
