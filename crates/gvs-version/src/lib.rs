//! Version patterns, candidate ranking, and selection.
//!
//! A [`VersionPattern`] is parsed from a partial version string such as `1`,
//! `1.22` or `go1.22.3`. Unspecified trailing components are wildcards.
//! [`select_best`] filters a candidate listing with the pattern and returns
//! the highest-priority match.
//!
//! # Example
//!
//! ```
//! use gvs_version::{Candidate, VersionPattern, select_best};
//!
//! let pattern: VersionPattern = "1.20".parse().unwrap();
//! let candidates = ["1.20.1", "1.20.14", "1.21.0"].map(Candidate::new);
//!
//! let best = select_best(&candidates, &pattern).unwrap();
//! assert_eq!(best.label(), "1.20.14");
//! ```

pub use candidate::{Candidate, Priority, Versioned, split_components};
pub use error::{Error, Result};
pub use pattern::{Component, VersionPattern};
pub use select::{matching, select_best};

mod candidate;
mod error;
mod pattern;
mod select;
