use std::fs;
use std::io;

use gvs_version::{Priority, VersionPattern, select_best};

use crate::error::{Error, Result};
use crate::layout::Layout;

/// Names of installed versions, highest priority first.
pub fn list_local(layout: &Layout) -> Result<Vec<String>> {
    let dir = layout.versions_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(Error::Install { path: dir, source }),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(Error::install(&dir))?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    names.sort_by(|a, b| Priority::of(b).cmp(&Priority::of(a)).then_with(|| a.cmp(b)));
    Ok(names)
}

/// The best installed version satisfying `pattern`.
pub fn find_local(layout: &Layout, pattern: &VersionPattern) -> Result<String> {
    let installed = list_local(layout)?;
    Ok(select_best(&installed, pattern)?.clone())
}
