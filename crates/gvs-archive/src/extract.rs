use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Archive name suffixes this crate extracts.
pub const SUFFIXES: &[&str] = &[".tar.gz", ".tgz"];

/// Counts of what an extraction reproduced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub directories: usize,
    pub files:       usize,
    pub symlinks:    usize,
    /// Bytes of regular-file content written.
    pub bytes:       u64,
}

impl Extracted {
    pub fn entry_count(&self) -> usize { self.directories + self.files + self.symlinks }
}

/// Destination directory for `source`: its path with the archive suffix
/// removed, next to the archive.
pub fn destination_for(source: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::UnsupportedFormat(source.to_path_buf()))?;

    SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
        .map(|stem| source.with_file_name(stem))
        .ok_or_else(|| Error::UnsupportedFormat(source.to_path_buf()))
}

/// Extract the archive at `source` next to it and return the destination root.
///
/// The destination is not removed if extraction fails part way.
pub fn extract(source: &Path) -> Result<PathBuf> {
    let dest = destination_for(source)?;
    let file = File::open(source).map_err(Error::filesystem(source))?;

    let extracted = unpack(file, &dest)?;
    info!(
        "extracted {} entries ({} bytes) into {}",
        extracted.entry_count(),
        extracted.bytes,
        dest.display()
    );
    Ok(dest)
}

/// Extract the gzip-compressed tar stream `reader` into `dest`.
pub fn unpack<R: Read>(reader: R, dest: &Path) -> Result<Extracted> {
    let mut decompressed = Vec::new();
    GzDecoder::new(reader)
        .read_to_end(&mut decompressed)
        .map_err(Error::Corrupt)?;
    debug!("decompressed {} bytes", decompressed.len());

    fs::create_dir_all(dest).map_err(Error::filesystem(dest))?;

    let mut archive = tar::Archive::new(Cursor::new(decompressed));
    let mut extracted = Extracted::default();

    for entry in archive.entries().map_err(Error::Corrupt)? {
        let mut entry = entry.map_err(Error::Corrupt)?;
        let target = dest.join(entry.path().map_err(Error::Corrupt)?);
        let mode = entry.header().mode().map_err(Error::Corrupt)?;
        let kind = entry.header().entry_type();

        if kind.is_dir() {
            ensure_directory(&target, mode)?;
            extracted.directories += 1;
        } else if kind.is_symlink() {
            let link = entry
                .link_name()
                .map_err(Error::Corrupt)?
                .ok_or_else(|| {
                    Error::Corrupt(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("symlink '{}' has no target", target.display()),
                    ))
                })?
                .into_owned();
            write_symlink(&link, &target)?;
            extracted.symlinks += 1;
        } else if kind.is_file() {
            extracted.bytes += write_file(&mut entry, &target, mode)?;
            extracted.files += 1;
        } else {
            debug!("skipping '{}' ({:?})", target.display(), kind);
        }
    }

    Ok(extracted)
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.exists() => {
            fs::create_dir_all(parent).map_err(Error::filesystem(parent))
        }
        _ => Ok(()),
    }
}

fn ensure_directory(path: &Path, mode: u32) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    ensure_parent(path)?;
    fs::create_dir(path).map_err(Error::filesystem(path))?;
    set_mode(path, mode)
}

fn write_file(reader: &mut impl Read, path: &Path, mode: u32) -> Result<u64> {
    ensure_parent(path)?;
    let mut file = File::create(path).map_err(Error::filesystem(path))?;
    let written = io::copy(reader, &mut file).map_err(Error::filesystem(path))?;
    set_mode(path, mode)?;
    Ok(written)
}

fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    ensure_parent(link)?;
    if fs::symlink_metadata(link).is_ok() {
        fs::remove_file(link).map_err(Error::filesystem(link))?;
    }
    symlink(target, link).map_err(Error::filesystem(link))
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> { std::os::unix::fs::symlink(target, link) }

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    let resolved = link.parent().map(|p| p.join(target));
    if resolved.is_some_and(|p| p.is_dir()) {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
        .map_err(Error::filesystem(path))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> { Ok(()) }
