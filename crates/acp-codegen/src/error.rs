//! Codegen error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to write a generated artifact.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("directory {} cannot be created", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file {} cannot be written", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A dependency cycle found while ordering generators.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("circular dependency: {}", cycle.join(" -> "))]
pub struct CycleError {
    /// Names along the cycle; the first name is repeated at the end.
    pub cycle: Vec<String>,
}
