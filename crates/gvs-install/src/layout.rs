use std::fs;
use std::path::{Path, PathBuf};

use gvs_resolve::{LOCAL_OVERRIDE_FILE, Resolver};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable overriding the root directory.
pub const ROOT_ENV: &str = "GVS_ROOT";

/// Commands that get a shim script in `bin/`.
pub const SHIMS: &[&str] = &["go", "gofmt"];

const GLOBAL_VERSION_FILE: &str = "version";
const CONFIG_FILE: &str = "config.toml";

// root
// - bin/        shim scripts, put on PATH
// - versions/   one directory per installed version
// - tmp/        downloads and extraction, same filesystem as versions/
// version       global version
// config.toml   optional settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// `$GVS_ROOT`, or `~/.gvs`.
    pub fn from_env() -> Result<Self> {
        if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(root));
        }
        let home = home::home_dir().ok_or(Error::NoHome)?;
        Ok(Self::new(home.join(".gvs")))
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn bin_dir(&self) -> PathBuf { self.root.join("bin") }

    pub fn versions_dir(&self) -> PathBuf { self.root.join("versions") }

    pub fn tmp_dir(&self) -> PathBuf { self.root.join("tmp") }

    pub fn global_file(&self) -> PathBuf { self.root.join(GLOBAL_VERSION_FILE) }

    pub fn config_file(&self) -> PathBuf { self.root.join(CONFIG_FILE) }

    pub fn version_dir(&self, version: &str) -> PathBuf { self.versions_dir().join(version) }

    /// Path of `command` inside an installed version.
    pub fn executable(&self, version: &str, command: &str) -> PathBuf {
        let mut path = self.version_dir(version).join("bin").join(command);
        if cfg!(windows) {
            path.set_extension("exe");
        }
        path
    }

    pub fn is_initialized(&self) -> bool { self.root.is_dir() }

    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized(self.root.clone()))
        }
    }

    /// Create the directory tree and the shim scripts. Safe to repeat.
    pub fn init(&self) -> Result<()> {
        for dir in [self.root.clone(), self.bin_dir(), self.versions_dir(), self.tmp_dir()] {
            fs::create_dir_all(&dir).map_err(Error::install(&dir))?;
        }
        for command in SHIMS {
            self.write_shim(command)?;
        }
        debug!("initialized {}", self.root.display());
        Ok(())
    }

    fn write_shim(&self, command: &str) -> Result<()> {
        let path = self.bin_dir().join(command);
        fs::write(&path, shim_script(command)).map_err(Error::install(&path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .map_err(Error::install(&path))?;
        }
        Ok(())
    }

    /// Select `version` globally.
    pub fn write_global(&self, version: &str) -> Result<PathBuf> {
        let path = self.global_file();
        write_version(&path, version)?;
        Ok(path)
    }

    /// Resolver reading this layout's global file.
    pub fn resolver(&self) -> Resolver { Resolver::new(self.global_file()) }
}

/// Select `version` for `dir` and its descendants.
pub fn write_local(dir: &Path, version: &str) -> Result<PathBuf> {
    let path = dir.join(LOCAL_OVERRIDE_FILE);
    write_version(&path, version)?;
    Ok(path)
}

fn write_version(path: &Path, version: &str) -> Result<()> {
    fs::write(path, normalize(version)).map_err(Error::install(path))
}

/// Strip the `v`/`go` prefix users tend to type.
pub fn normalize(version: &str) -> &str {
    version.trim().trim_start_matches(['v', 'g', 'o'])
}

pub fn shim_script(command: &str) -> String {
    format!("#!/bin/sh\nexec gvs run {command} -- \"$@\"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_tree() {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(temp.path().join(".gvs"));
        assert!(layout.ensure_initialized().is_err());

        layout.init().unwrap();
        layout.init().unwrap();

        assert!(layout.ensure_initialized().is_ok());
        assert!(layout.versions_dir().is_dir());
        assert!(layout.tmp_dir().is_dir());
        for command in SHIMS {
            let shim = layout.bin_dir().join(command);
            let content = fs::read_to_string(&shim).unwrap();
            assert!(content.contains(&format!("gvs run {command} --")));

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mode = fs::metadata(&shim).unwrap().permissions().mode();
                assert_eq!(mode & 0o777, 0o755);
            }
        }
    }

    #[test]
    fn test_write_versions_trims_prefix() {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(temp.path());

        let global = layout.write_global("go1.22").unwrap();
        assert_eq!(fs::read_to_string(global).unwrap(), "1.22");

        let local = write_local(temp.path(), "v1.21.3\n").unwrap();
        assert_eq!(local, temp.path().join(".go-version"));
        assert_eq!(fs::read_to_string(local).unwrap(), "1.21.3");
    }

    #[test]
    fn test_global_file_feeds_resolver() {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(temp.path());
        layout.write_global("1.22").unwrap();

        let decision = layout.resolver().global().unwrap();
        assert_eq!(decision.raw, "1.22");
    }

    #[test]
    fn test_executable_path() {
        let layout = Layout::new("/opt/gvs");
        let exe = layout.executable("1.22.3", "gofmt");
        assert!(exe.starts_with("/opt/gvs/versions/1.22.3/bin"));
    }
}
