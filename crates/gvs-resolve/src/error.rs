use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no version configured: no local version file found and global version file '{0}' is missing")]
    NoVersionConfigured(PathBuf),

    #[error("{path}:{line}: {reason}")]
    Manifest {
        path:   PathBuf,
        line:   usize,
        reason: String,
    },

    #[error("failed to read '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
