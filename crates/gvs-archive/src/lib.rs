//! Extraction of gzip-compressed tar archives.
//!
//! The gzip stream is decompressed fully into memory before tar entries are
//! read from it. Directories, regular files and symlinks are reproduced with
//! their recorded mode bits; other entry types are skipped. Entry paths and
//! link targets are taken as the archive declares them.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let root = gvs_archive::extract(Path::new("/tmp/go1.22.3.linux-amd64.tar.gz"))?;
//! assert_eq!(root, Path::new("/tmp/go1.22.3.linux-amd64"));
//! # Ok::<(), gvs_archive::Error>(())
//! ```

pub use error::{Error, Result};
pub use extract::{Extracted, SUFFIXES, destination_for, extract, unpack};

mod error;
mod extract;
