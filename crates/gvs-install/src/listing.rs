use gvs_fetch::HttpClient;
use gvs_version::Versioned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::platform::Platform;

const ARCHIVE_KIND: &str = "archive";

/// One published release, as listed by the download page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteRelease {
    /// Version label, prefixed with `go`.
    pub version: String,
    #[serde(default)]
    pub stable:  bool,
    #[serde(default)]
    pub files:   Vec<RemoteFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    pub filename: String,
    #[serde(default)]
    pub os:       String,
    #[serde(default)]
    pub arch:     String,
    #[serde(default)]
    pub version:  String,
    #[serde(default)]
    pub sha256:   String,
    #[serde(default)]
    pub size:     u64,
    /// `archive`, `installer` or `source`.
    #[serde(default)]
    pub kind:     String,
}

impl RemoteRelease {
    /// Version without the `go` prefix, the name it is installed under.
    pub fn installed_name(&self) -> &str { self.version.trim_start_matches("go") }

    /// The gzip tarball built for `platform`.
    pub fn artifact(&self, platform: &Platform) -> Option<&RemoteFile> {
        self.files.iter().find(|f| {
            f.kind == ARCHIVE_KIND
                && f.os == platform.os
                && f.arch == platform.arch
                && f.filename.ends_with(".tar.gz")
        })
    }

    pub fn artifact_or_err(&self, platform: &Platform) -> Result<&RemoteFile> {
        self.artifact(platform).ok_or_else(|| Error::NoArtifact {
            version: self.installed_name().to_string(),
            os:      platform.os.clone(),
            arch:    platform.arch.clone(),
        })
    }
}

impl Versioned for RemoteRelease {
    fn raw_version(&self) -> &str { &self.version }
}

/// Decode a release listing body.
pub fn parse_releases(url: &str, body: &[u8]) -> Result<Vec<RemoteRelease>> {
    serde_json::from_slice(body).map_err(|e| Error::Listing {
        url:    url.to_string(),
        reason: e.to_string(),
    })
}

/// GET and decode the release listing at `url`.
pub async fn fetch_releases<C: HttpClient>(client: &C, url: &str) -> Result<Vec<RemoteRelease>> {
    let response = client.get(url, None).await.map_err(|e| gvs_fetch::Error::Network {
        url:    url.to_string(),
        reason: e.to_string(),
    })?;

    if response.status != 200 {
        return Err(gvs_fetch::Error::RemoteUnavailable {
            url:    url.to_string(),
            status: response.status,
        }
        .into());
    }

    let releases = parse_releases(url, &response.body)?;
    debug!("{} releases listed at {}", releases.len(), url);
    Ok(releases)
}
