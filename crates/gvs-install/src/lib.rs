//! Installed-version bookkeeping and acquisition.
//!
//! A [`Layout`] names the on-disk root. Installed versions are the
//! directories under `versions/`, named by exact version; [`find_local`]
//! matches a pattern against them. An [`Acquirer`] fills the gap when nothing
//! matches: it picks the best release from the remote listing, downloads the
//! platform archive with a [`ChunkedDownloader`](gvs_fetch::ChunkedDownloader),
//! extracts it and moves the toolchain into `versions/`.

pub use acquire::Acquirer;
pub use error::{Error, Result};
pub use layout::{Layout, ROOT_ENV, SHIMS, normalize, shim_script, write_local};
pub use listing::{RemoteFile, RemoteRelease, fetch_releases, parse_releases};
pub use local::{find_local, list_local};
pub use platform::Platform;
pub use settings::{DEFAULT_DOWNLOAD_URL, DEFAULT_LISTING_URL, Settings};

mod acquire;
mod error;
mod layout;
mod listing;
mod local;
mod platform;
mod settings;
