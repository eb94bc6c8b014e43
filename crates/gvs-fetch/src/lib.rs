//! Parallel byte-range downloading with ordered reassembly.
//!
//! # Protocol
//!
//! 1. `HEAD` the resource for its content length.
//! 2. Partition `[0, length)` into `W` contiguous [`Segment`]s.
//! 3. Issue one ranged `GET` per segment concurrently; each must answer
//!    `206 Partial Content` with exactly the requested number of bytes.
//! 4. Join every worker. Any failure fails the whole fetch and every failure
//!    is reported.
//! 5. Concatenate the segment buffers in index order into a staging file and
//!    hand it back reopened read-only.
//!
//! The HTTP layer is the [`HttpClient`] capability so callers can substitute
//! a test double; [`ReqwestClient`] is the production implementation.

pub use downloader::{ChunkedDownloader, FetchOptions, FetchedArchive, default_workers};
pub use error::{Error, Result, SegmentFailure};
pub use http::{HttpClient, Response};
pub use progress::{Progress, ProgressCallback};
pub use segment::{Segment, partition};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;

pub use tokio_util::sync::CancellationToken;

mod downloader;
mod error;
mod http;
mod progress;
mod segment;
