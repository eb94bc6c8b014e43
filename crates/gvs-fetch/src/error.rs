//! Error types for gvs-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why one range request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("segment {index} ({range}): {reason}")]
pub struct SegmentFailure {
    pub index:  usize,
    pub range:  String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{url} is unavailable: response status is {status}")]
    RemoteUnavailable { url: String, status: u16 },

    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("{url} did not report a content length")]
    MissingContentLength { url: String },

    #[error("{url} is empty")]
    EmptyResource { url: String },

    #[error("download of {url} failed in {} of {segments} segments: {}", failures.len(), join(failures))]
    PartialFetch {
        url:      String,
        segments: usize,
        failures: Vec<SegmentFailure>,
    },

    #[error("download of {url} was cancelled")]
    Cancelled { url: String },

    #[error("failed to stage download in '{path}': {source}")]
    Staging { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

fn join(failures: &[SegmentFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
