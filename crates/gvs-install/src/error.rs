use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("gvs is not initialized at '{0}', run `gvs init`")]
    NotInitialized(PathBuf),

    #[error("no home directory found, set GVS_ROOT")]
    NoHome,

    #[error("go{version} has no archive for {os}/{arch}")]
    NoArtifact {
        version: String,
        os:      String,
        arch:    String,
    },

    #[error("invalid release listing from {url}: {reason}")]
    Listing { url: String, reason: String },

    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url:    String,
        source: url::ParseError,
    },

    #[error("failed to install '{path}': {source}")]
    Install { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Settings(#[from] figment::Error),

    #[error(transparent)]
    Version(#[from] gvs_version::Error),

    #[error(transparent)]
    Fetch(#[from] gvs_fetch::Error),

    #[error(transparent)]
    Archive(#[from] gvs_archive::Error),
}

impl Error {
    pub(crate) fn install(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Install { path, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
