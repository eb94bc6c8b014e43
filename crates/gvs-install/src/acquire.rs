use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use gvs_fetch::{
    CancellationToken, ChunkedDownloader, FetchOptions, HttpClient, ProgressCallback,
    default_workers,
};
use gvs_version::{VersionPattern, select_best};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::listing::{RemoteRelease, fetch_releases};
use crate::local::find_local;
use crate::platform::Platform;
use crate::settings::Settings;

/// Directory inside an extracted archive holding the toolchain.
const ARCHIVE_ROOT: &str = "go";

/// Downloads, extracts and registers versions under a [`Layout`].
pub struct Acquirer<C: HttpClient> {
    client:      Arc<C>,
    layout:      Layout,
    settings:    Settings,
    platform:    Platform,
    on_progress: Option<ProgressCallback>,
}

impl<C: HttpClient> Acquirer<C> {
    pub fn new(client: C, layout: Layout, settings: Settings) -> Self {
        Self {
            client: Arc::new(client),
            layout,
            settings,
            platform: Platform::current(),
            on_progress: None,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn layout(&self) -> &Layout { &self.layout }

    pub fn settings(&self) -> &Settings { &self.settings }

    /// Every release the listing publishes, unstable ones dropped unless
    /// enabled in the settings.
    pub async fn releases(&self, cancel: &CancellationToken) -> Result<Vec<RemoteRelease>> {
        let url = &self.settings.listing_url;
        let mut releases = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(gvs_fetch::Error::Cancelled { url: url.clone() }.into());
            }
            releases = fetch_releases(self.client.as_ref(), url) => releases?,
        };
        if !self.settings.include_unstable {
            releases.retain(|r| r.stable);
        }
        Ok(releases)
    }

    /// Download the best release matching `pattern` and install it.
    ///
    /// Returns the installed version name. Nothing is registered under
    /// `versions/` unless every step succeeds.
    pub async fn acquire(&self, pattern: &VersionPattern, cancel: &CancellationToken) -> Result<String> {
        self.layout.ensure_initialized()?;

        let releases = self.releases(cancel).await?;
        let release = select_best(&releases, pattern)?;
        let file = release.artifact_or_err(&self.platform)?;
        let url = self.download_url(&file.filename)?;
        info!("download {}", url);

        let options = FetchOptions {
            workers:     default_workers(self.settings.workers_per_cpu),
            staging_dir: self.layout.tmp_dir(),
            on_progress: self.on_progress.clone(),
        };
        let fetched = ChunkedDownloader::from_shared(Arc::clone(&self.client))
            .with_options(options)
            .fetch(url.as_str(), cancel)
            .await?;
        let (archive_file, archive) = fetched.into_parts();
        drop(archive_file);

        info!("extract {}", archive.display());
        let extracted = gvs_archive::extract(&archive);
        remove_best_effort(&archive);
        let extracted = extracted?;

        let name = release.installed_name().to_string();
        let target = self.layout.version_dir(&name);
        install(&extracted.join(ARCHIVE_ROOT), &target)?;
        remove_best_effort(&extracted);

        info!("installed {} at {}", name, target.display());
        Ok(name)
    }

    /// The installed version matching `pattern`, acquiring it first if none is.
    pub async fn ensure_installed(
        &self,
        pattern: &VersionPattern,
        cancel: &CancellationToken,
    ) -> Result<String> {
        match find_local(&self.layout, pattern) {
            Ok(name) => return Ok(name),
            Err(Error::Version(gvs_version::Error::NoMatch(_))) => {
                warn!("{} is not installed, downloading", pattern);
            }
            Err(e) => return Err(e),
        }

        self.acquire(pattern, cancel).await?;
        find_local(&self.layout, pattern)
    }

    fn download_url(&self, filename: &str) -> Result<Url> {
        let mut base = self.settings.download_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|b| b.join(filename))
            .map_err(|source| Error::InvalidUrl { url: base, source })
    }
}

/// Replace `target` with `source` by removing then renaming.
fn install(source: &Path, target: &Path) -> Result<()> {
    match fs::remove_dir_all(target) {
        Ok(()) => debug!("removed stale {}", target.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(Error::Install {
                path: target.to_path_buf(),
                source,
            });
        }
    }
    fs::rename(source, target).map_err(Error::install(target))
}

fn remove_best_effort(path: &Path) {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    if let Err(e) = result {
        warn!("failed to remove {}: {}", path.display(), e);
    }
}
