// src/query.rs

//! Package queries across all detected package managers
//!
//! `PkgQuery` is what a host application holds on to. It owns the registry
//! built at construction time and a bounded cache of ownership results.
//! None of its query methods fail; problems show up as empty results and in
//! the log.

use crate::cache::{DEFAULT_CAPACITY, OwnerCache, normalize_path};
use crate::error::{Error, Result};
use crate::packages::PackageRecord;
use crate::registry::{RegisteredBackend, Registry};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Settings for a `PkgQuery`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Maximum number of paths whose owner is remembered
    pub cache_capacity: usize,
}

impl QueryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(Error::InvalidConfig(
                "cache capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Query service over the host's package managers
pub struct PkgQuery {
    registry: Registry,
    cache: Mutex<OwnerCache>,
}

impl PkgQuery {
    /// Detect the host's package managers with default settings
    pub fn detect() -> Self {
        Self::new(Registry::detect(), &QueryConfig::default())
    }

    /// Detect the host's package managers with `config`
    pub fn with_config(config: &QueryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(Registry::detect(), config))
    }

    /// Query service over an already built registry
    pub fn from_registry(registry: Registry, config: &QueryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(registry, config))
    }

    fn new(registry: Registry, config: &QueryConfig) -> Self {
        Self {
            registry,
            cache: Mutex::new(OwnerCache::new(config.cache_capacity)),
        }
    }

    /// Whether at least one supported package manager was found
    pub fn has_supported_manager(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Active backends in query order, with their roles
    pub fn backends(&self) -> &[RegisteredBackend] {
        self.registry.entries()
    }

    /// Name of the package owning `path`, empty if none or unknown
    ///
    /// Each path is asked at most once; later calls, including those whose
    /// first answer was empty, are served from the cache. The cache lock is
    /// held across the backend calls so concurrent lookups never spawn
    /// duplicate commands.
    pub fn ownership_of(&self, path: &str) -> String {
        let key = normalize_path(path);
        let mut cache = self.lock_cache();

        if let Some(package) = cache.get(&key) {
            log_owner("Cache", package, &key);
            return package.to_string();
        }

        let mut found_by = "all";
        let mut package = String::new();

        for backend in self.registry.backends() {
            package = backend.owning_package(&key);
            if !package.is_empty() {
                found_by = backend.name();
                break;
            }
        }

        log_owner(found_by, &package, &key);
        cache.put(key, package.clone());
        package
    }

    /// Installed packages of every active backend, in backend order
    ///
    /// A package managed by two backends appears twice.
    pub fn installed_packages(&self) -> Vec<PackageRecord> {
        self.registry
            .backends()
            .flat_map(|backend| backend.installed_packages())
            .collect()
    }

    /// Files owned by `pkg`, from the first backend that knows any
    pub fn file_list_of(&self, pkg: &PackageRecord) -> Vec<String> {
        for backend in self.registry.backends() {
            let files = backend.file_list(pkg);
            if !files.is_empty() {
                debug!("{}: {} files in {}", backend.name(), files.len(), pkg.name);
                return files;
            }
        }

        Vec::new()
    }

    /// Number of cached ownership results
    pub fn cached_paths(&self) -> usize {
        self.lock_cache().len()
    }

    /// Forget all cached ownership results
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> MutexGuard<'_, OwnerCache> {
        // The cache holds plain strings; a panic elsewhere cannot leave it torn
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn log_owner(found_by: &str, package: &str, path: &str) {
    if package.is_empty() {
        debug!("{}: No package owns {}", found_by, path);
    } else {
        debug!("{}: Package {} owns {}", found_by, package, path);
    }
}
