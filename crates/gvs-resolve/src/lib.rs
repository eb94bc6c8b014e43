//! Decide which toolchain version a working directory asks for.
//!
//! # Precedence
//!
//! Starting at the working directory and moving towards the filesystem root,
//! each directory is checked for, in order:
//!
//! 1. `.go-version` - a plain-text local override
//! 2. `go.mod` - `toolchain` directive, else `go` directive
//! 3. `go.work` - `go` directive
//!
//! The first hit wins. When no directory decides, the global version file is
//! read; if it is missing the result is [`Error::NoVersionConfigured`].

pub use error::{Error, Result};
pub use manifest::{Manifest, parse_manifest};
pub use resolver::{
    Decision, LOCAL_OVERRIDE_FILE, Resolver, TOOLCHAIN_MANIFEST, VersionSource, WORKSPACE_MANIFEST,
};

mod error;
mod manifest;
mod resolver;
