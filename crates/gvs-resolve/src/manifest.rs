//! Reader for the `go` and `toolchain` directives of `go.mod` / `go.work`.
//!
//! Only the two directives that name a version are interpreted. Other
//! directives, including parenthesized blocks, are skipped but must still be
//! well formed.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static GO_VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<major>[1-9][0-9]*)\.(?<minor>0|[1-9][0-9]*)(?:\.(?<patch>0|[1-9][0-9]*))?(?<pre>[a-z]+[0-9]+)?$").unwrap()
});

static TOOLCHAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^go(?<version>[1-9][0-9]*\.(?:0|[1-9][0-9]*)(?:\.(?:0|[1-9][0-9]*))?(?:[a-z]+[0-9]+)?)(?:-.+)?$").unwrap()
});

/// Version-bearing directives of a module or workspace file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Argument of the `go` directive, e.g. `1.22`.
    pub go:        Option<String>,
    /// Version embedded in the `toolchain` directive, `go1.22.3` -> `1.22.3`.
    pub toolchain: Option<String>,
}

impl Manifest {
    /// The toolchain version if declared, otherwise the `go` version.
    pub fn declared_version(&self) -> Option<&str> {
        self.toolchain.as_deref().or(self.go.as_deref())
    }
}

/// Parse the contents of a `go.mod` or `go.work` file read from `path`.
pub fn parse_manifest(path: &Path, content: &str) -> Result<Manifest> {
    let fail = |line: usize, reason: String| Error::Manifest {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut manifest = Manifest::default();
    let mut open_block: Option<(usize, String)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if open_block.is_some() {
            if line == ")" {
                open_block = None;
            }
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(verb) = fields.next() else { continue };
        let args: Vec<&str> = fields.collect();

        if args.last() == Some(&"(") || verb.ends_with('(') {
            let verb = verb.trim_end_matches('(');
            if matches!(verb, "go" | "toolchain") {
                return Err(fail(line_no, format!("{} directive does not take a block", verb)));
            }
            open_block = Some((line_no, verb.to_string()));
            continue;
        }

        match verb {
            "go" => {
                if manifest.go.is_some() {
                    return Err(fail(line_no, "repeated go statement".into()));
                }
                let [version] = args.as_slice() else {
                    return Err(fail(line_no, "usage: go 1.23".into()));
                };
                if !GO_VERSION_REGEX.is_match(version) {
                    return Err(fail(
                        line_no,
                        format!("invalid go version '{}': must match format 1.23.0", version),
                    ));
                }
                manifest.go = Some(version.to_string());
            }
            "toolchain" => {
                if manifest.toolchain.is_some() {
                    return Err(fail(line_no, "repeated toolchain statement".into()));
                }
                let [name] = args.as_slice() else {
                    return Err(fail(line_no, "usage: toolchain go1.23.0".into()));
                };
                if *name == "default" {
                    continue;
                }
                let caps = TOOLCHAIN_REGEX.captures(name).ok_or_else(|| {
                    fail(
                        line_no,
                        format!("invalid toolchain name '{}': must match format go1.23.0", name),
                    )
                })?;
                manifest.toolchain = caps.name("version").map(|m| m.as_str().to_string());
            }
            _ => {}
        }
    }

    if let Some((line_no, verb)) = open_block {
        return Err(fail(line_no, format!("unterminated {} block", verb)));
    }

    Ok(manifest)
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}
