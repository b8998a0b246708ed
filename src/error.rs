//! RU-000: Crate error type and process exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while translating a recipe into a unit definition.
#[derive(Error, Debug)]
pub enum Error {
    /// The recipe is well-formed YAML but describes something we cannot translate
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Bad command-line input
    #[error("usage error: {0}")]
    Usage(String),

    /// Malformed YAML or a missing required recipe key
    #[error("parse error: {0}")]
    Parse(String),

    /// Reading the recipe or writing an artifact failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code: 2 for usage errors, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Configuration(_) | Self::Parse(_) | Self::Io { .. } => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
