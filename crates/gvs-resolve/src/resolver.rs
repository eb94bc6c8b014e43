use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::manifest::parse_manifest;

pub const LOCAL_OVERRIDE_FILE: &str = ".go-version";
pub const TOOLCHAIN_MANIFEST: &str = "go.mod";
pub const WORKSPACE_MANIFEST: &str = "go.work";

/// The file that decided the version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    LocalOverride(PathBuf),
    Toolchain(PathBuf),
    Workspace(PathBuf),
    Global(PathBuf),
}

impl VersionSource {
    pub fn path(&self) -> &Path {
        match self {
            VersionSource::LocalOverride(p)
            | VersionSource::Toolchain(p)
            | VersionSource::Workspace(p)
            | VersionSource::Global(p) => p,
        }
    }
}

/// A raw version string and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub raw:    String,
    pub source: VersionSource,
}

/// Walks from a working directory towards the root looking for version files.
#[derive(Debug, Clone)]
pub struct Resolver {
    global_file: PathBuf,
    ceiling:     Option<PathBuf>,
}

impl Resolver {
    pub fn new(global_file: impl Into<PathBuf>) -> Self {
        Self {
            global_file: global_file.into(),
            ceiling:     None,
        }
    }

    /// Stop the upward walk after `dir` instead of the filesystem root.
    pub fn with_ceiling(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ceiling = Some(dir.into());
        self
    }

    pub fn global_file(&self) -> &Path { &self.global_file }

    /// Decide the effective version for `start`.
    pub fn decide(&self, start: &Path) -> Result<Decision> {
        let start = start.canonicalize().map_err(|source| Error::Io {
            path: start.to_path_buf(),
            source,
        })?;
        let ceiling = match &self.ceiling {
            Some(dir) => Some(dir.canonicalize().map_err(|source| Error::Io {
                path: dir.clone(),
                source,
            })?),
            None => None,
        };

        let depth = start.components().count();
        for dir in start.ancestors().take(depth) {
            if let Some(decision) = self.decide_in(dir)? {
                return Ok(decision);
            }
            if ceiling.as_deref() == Some(dir) {
                debug!("stop at ceiling {}", dir.display());
                break;
            }
        }

        self.global()
    }

    /// Check the three per-directory sources of `dir`, in precedence order.
    fn decide_in(&self, dir: &Path) -> Result<Option<Decision>> {
        let path = dir.join(LOCAL_OVERRIDE_FILE);
        if let Some(content) = read_optional(&path)? {
            debug!("use {}", path.display());
            return Ok(Some(Decision {
                raw:    content.trim_end().to_string(),
                source: VersionSource::LocalOverride(path),
            }));
        }

        let path = dir.join(TOOLCHAIN_MANIFEST);
        if let Some(content) = read_optional(&path)? {
            let manifest = parse_manifest(&path, &content)?;
            if let Some(version) = manifest.declared_version() {
                debug!("use {}", path.display());
                return Ok(Some(Decision {
                    raw:    version.to_string(),
                    source: VersionSource::Toolchain(path),
                }));
            }
        }

        let path = dir.join(WORKSPACE_MANIFEST);
        if let Some(content) = read_optional(&path)? {
            let manifest = parse_manifest(&path, &content)?;
            if let Some(version) = manifest.go {
                debug!("use {}", path.display());
                return Ok(Some(Decision {
                    raw:    version,
                    source: VersionSource::Workspace(path),
                }));
            }
        }

        Ok(None)
    }

    /// Read the global version file.
    pub fn global(&self) -> Result<Decision> {
        match read_optional(&self.global_file)? {
            Some(content) => {
                debug!("use global {}", self.global_file.display());
                Ok(Decision {
                    raw:    content.trim().to_string(),
                    source: VersionSource::Global(self.global_file.clone()),
                })
            }
            None => Err(Error::NoVersionConfigured(self.global_file.clone())),
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        root:   TempDir,
        global: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let root = tempdir().unwrap();
            let global = root.path().join("gvs").join("version");
            fs::create_dir_all(global.parent().unwrap()).unwrap();
            Self { root, global }
        }

        fn dir(&self, rel: &str) -> PathBuf {
            let dir = self.root.path().join("work").join(rel);
            fs::create_dir_all(&dir).unwrap();
            dir
        }

        fn resolver(&self) -> Resolver { Resolver::new(&self.global).with_ceiling(self.root.path()) }
    }

    #[test]
    fn test_local_override_beats_ancestor_manifest() {
        let fx = Fixture::new();
        let parent = fx.dir("repo");
        let child = fx.dir("repo/cmd/tool");
        fs::write(parent.join("go.mod"), "module x\n\ngo 1.22\n").unwrap();
        fs::write(child.join(".go-version"), "1.19\n").unwrap();

        let decision = fx.resolver().decide(&child).unwrap();
        assert_eq!(decision.raw, "1.19");
        assert!(matches!(decision.source, VersionSource::LocalOverride(_)));
    }

    #[test]
    fn test_ancestor_manifest_found() {
        let fx = Fixture::new();
        let parent = fx.dir("repo");
        let child = fx.dir("repo/internal/pkg");
        fs::write(parent.join("go.mod"), "module x\n\ngo 1.22\ntoolchain go1.22.5\n").unwrap();

        let decision = fx.resolver().decide(&child).unwrap();
        assert_eq!(decision.raw, "1.22.5");
        let expected = parent.canonicalize().unwrap().join("go.mod");
        assert_eq!(decision.source.path(), expected.as_path());
    }

    #[test]
    fn test_same_directory_precedence() {
        let fx = Fixture::new();
        let dir = fx.dir("repo");
        fs::write(dir.join("go.work"), "go 1.20\n").unwrap();
        fs::write(dir.join("go.mod"), "module x\ngo 1.21\n").unwrap();

        let decision = fx.resolver().decide(&dir).unwrap();
        assert_eq!(decision.raw, "1.21");

        fs::write(dir.join(".go-version"), "1.18.10").unwrap();
        let decision = fx.resolver().decide(&dir).unwrap();
        assert_eq!(decision.raw, "1.18.10");
    }

    #[test]
    fn test_manifest_without_version_falls_through() {
        let fx = Fixture::new();
        let parent = fx.dir("ws");
        let child = fx.dir("ws/mod");
        fs::write(child.join("go.mod"), "module x\n").unwrap();
        fs::write(parent.join("go.work"), "go 1.23\nuse ./mod\n").unwrap();

        let decision = fx.resolver().decide(&child).unwrap();
        assert_eq!(decision.raw, "1.23");
        assert!(matches!(decision.source, VersionSource::Workspace(_)));
    }

    #[test]
    fn test_global_fallback() {
        let fx = Fixture::new();
        let dir = fx.dir("plain/dir");
        fs::write(&fx.global, "1.21\n").unwrap();

        let decision = fx.resolver().decide(&dir).unwrap();
        assert_eq!(decision.raw, "1.21");
        assert!(matches!(decision.source, VersionSource::Global(_)));
    }

    #[test]
    fn test_walk_to_filesystem_root_reaches_global() {
        let fx = Fixture::new();
        let dir = fx.dir("a/b/c");
        fs::write(&fx.global, "1.21\n").unwrap();

        let decision = Resolver::new(&fx.global).decide(&dir).unwrap();
        assert_eq!(decision.raw, "1.21");
        assert!(matches!(decision.source, VersionSource::Global(_)));
    }

    #[test]
    fn test_nothing_configured() {
        let fx = Fixture::new();
        let dir = fx.dir("plain");

        let err = fx.resolver().decide(&dir).unwrap_err();
        assert!(matches!(err, Error::NoVersionConfigured(_)));
    }

    #[test]
    fn test_manifest_parse_error_is_surfaced() {
        let fx = Fixture::new();
        let parent = fx.dir("repo");
        let child = fx.dir("repo/sub");
        fs::write(child.join("go.mod"), "module x\ngo not-a-version\n").unwrap();
        fs::write(parent.join(".go-version"), "1.20").unwrap();
        fs::write(&fx.global, "1.21").unwrap();

        let err = fx.resolver().decide(&child).unwrap_err();
        assert!(matches!(err, Error::Manifest { line: 2, .. }));
    }
}
