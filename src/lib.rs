// src/lib.rs

//! pkgquery
//!
//! Answers "which installed package owns this path?" and "what is
//! installed?" on hosts managed by dpkg, rpm or pacman, through one API.
//!
//! # Architecture
//!
//! - Backends: one `PackageBackend` per package manager, talking to its CLI
//! - Registry: probes the host once, primary manager first, secondaries after
//! - Cache: bounded FIFO of path ownership results
//! - Query service: `PkgQuery`, the object a host application holds on to

pub mod cache;
pub mod command;
mod error;
pub mod packages;
pub mod query;
pub mod registry;

pub use error::{Error, Result};
pub use packages::{BackendKind, PackageBackend, PackageRecord};
pub use query::{PkgQuery, QueryConfig};
pub use registry::{BackendRole, Registry};
