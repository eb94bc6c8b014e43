use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid version format: '{0}'")]
    InvalidVersionFormat(String),

    #[error("no version matches '{0}'")]
    NoMatch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
