// src/error.rs

use thiserror::Error;

/// Core error types for pkgquery
#[derive(Error, Debug)]
pub enum Error {
    /// An external package manager command could not be started
    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Rejected query configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias using pkgquery's Error type
pub type Result<T> = std::result::Result<T, Error>;
