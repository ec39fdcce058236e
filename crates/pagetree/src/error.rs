// File: src/error.rs
// Purpose: Fatal errors of a route generation pass

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a build pass
///
/// Everything else (path conflicts, broken metadata) is recovered from and logged.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("failed to list directory {path:?}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read page file {path:?}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("pages directory {0:?} does not exist")]
    MissingPagesDir(PathBuf),
}

impl RouteError {
    /// Path of the file or directory the error is about
    pub fn path(&self) -> &std::path::Path {
        match self {
            RouteError::ListDir { path, .. }
            | RouteError::ReadFile { path, .. }
            | RouteError::MissingPagesDir(path) => path,
        }
    }
}

pub type Result<T, E = RouteError> = std::result::Result<T, E>;
