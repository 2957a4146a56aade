// src/cache.rs

//! Bounded cache of path ownership results
//!
//! Keys are normalized paths, values are package names. An empty name is a
//! cached "no owner" answer, distinct from a missing entry. When full, the
//! oldest inserted entry is evicted first.

use std::collections::{HashMap, VecDeque};

/// Default number of paths kept in the cache
pub const DEFAULT_CAPACITY: usize = 500;

/// Bounded FIFO map from path to owning package name
#[derive(Debug)]
pub struct OwnerCache {
    entries: HashMap<String, String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl OwnerCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Cached owner of `path`, `None` if the path was never stored
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Store the owner of `path`
    ///
    /// Updating a resident path keeps its position in the eviction order.
    pub fn put(&mut self, path: impl Into<String>, package: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }

        let path = path.into();
        let package = package.into();

        if let Some(existing) = self.entries.get_mut(&path) {
            *existing = package;
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(path.clone());
        self.entries.insert(path, package);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for OwnerCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Lexically normalize a path for use as a cache key
///
/// Collapses repeated slashes, drops `.` components and a trailing slash.
/// `..` is kept as is and symlinks are not resolved.
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let parts: Vec<&str> = path
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) if !path.is_empty() => ".".to_string(),
        (false, _) => joined,
    }
}
