use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported archive format: '{0}'")]
    UnsupportedFormat(PathBuf),

    #[error("archive is corrupted: {0}")]
    Corrupt(#[source] io::Error),

    #[error("failed to write '{path}': {source}")]
    Filesystem { path: PathBuf, source: io::Error },
}

impl Error {
    pub(crate) fn filesystem(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Filesystem { path, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
