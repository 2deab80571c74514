// src/error.rs
// =============================================================================
// Typed errors for the parts of the program that can actually fail.
//
// Individual URL failures are not errors: probes report them as
// ProbeOutcome::Failure. What remains is:
// - LoadError: the message store is missing or unreadable (fatal)
// - ConfigError: a resolution setting is out of range
// - ResolveError: the HTTP client could not be built
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("message store not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read message store {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse message store {} (line {line}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max workers must be greater than zero")]
    ZeroWorkers,
    #[error("request timeout must be greater than zero seconds")]
    ZeroTimeout,
    #[error("pool deadline must be greater than zero seconds")]
    ZeroDeadline,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
