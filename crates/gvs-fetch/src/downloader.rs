use std::fs::{self, File};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result, SegmentFailure};
use crate::http::HttpClient;
use crate::progress::{Progress, ProgressCallback};
use crate::segment::{Segment, partition};

const DEFAULT_WORKERS_PER_CPU: usize = 4;

/// Worker count: logical CPUs times `per_cpu`.
pub fn default_workers(per_cpu: usize) -> usize {
    let cpus = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    cpus * per_cpu.max(1)
}

#[derive(Clone)]
pub struct FetchOptions {
    /// Number of concurrent range requests per fetch.
    pub workers:     usize,
    /// Directory receiving the reassembled file.
    pub staging_dir: PathBuf,
    pub on_progress: Option<ProgressCallback>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            workers:     default_workers(DEFAULT_WORKERS_PER_CPU),
            staging_dir: std::env::temp_dir(),
            on_progress: None,
        }
    }
}

impl std::fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOptions")
            .field("workers", &self.workers)
            .field("staging_dir", &self.staging_dir)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl FetchOptions {
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }
}

/// A fully downloaded, flushed file reopened read-only.
#[derive(Debug)]
pub struct FetchedArchive {
    path: PathBuf,
    file: File,
}

impl FetchedArchive {
    pub fn path(&self) -> &Path { &self.path }

    pub fn file(&self) -> &File { &self.file }

    pub fn into_parts(self) -> (File, PathBuf) { (self.file, self.path) }
}

/// Downloads one resource through parallel byte-range requests.
pub struct ChunkedDownloader<C: HttpClient> {
    client:  Arc<C>,
    options: FetchOptions,
}

impl<C: HttpClient> ChunkedDownloader<C> {
    pub fn new(client: C) -> Self { Self::from_shared(Arc::new(client)) }

    pub fn from_shared(client: Arc<C>) -> Self {
        Self {
            client,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FetchOptions { &self.options }

    /// Fetch `url` into a staging file.
    ///
    /// Either every segment arrives and the reassembled file is returned, or
    /// the fetch fails and no file is left in the staging directory.
    pub async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<FetchedArchive> {
        let length = self.probe(url, cancel).await?;
        let segments = partition(length, self.options.workers);
        debug!("fetch {} ({} bytes) in {} segments", url, length, segments.len());
        self.notify(Progress::Probed {
            total:    length,
            segments: segments.len(),
        });

        let handles: Vec<JoinHandle<std::result::Result<Bytes, String>>> = segments
            .iter()
            .map(|segment| self.spawn_segment(url, segment.clone(), cancel.clone()))
            .collect();

        let mut buffers = Vec::with_capacity(segments.len());
        let mut failures = Vec::new();
        for (segment, handle) in segments.iter().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(format!("worker aborted: {}", e)),
            };
            match outcome {
                Ok(body) => buffers.push(body),
                Err(reason) => failures.push(SegmentFailure {
                    index: segment.index,
                    range: segment.range_header(),
                    reason,
                }),
            }
        }

        if cancel.is_cancelled() {
            return Err(Error::Cancelled {
                url: url.to_string(),
            });
        }
        if !failures.is_empty() {
            return Err(Error::PartialFetch {
                url: url.to_string(),
                segments: segments.len(),
                failures,
            });
        }

        let archive = self.assemble(url, &buffers)?;
        self.notify(Progress::Assembled {
            path: archive.path.clone(),
        });
        Ok(archive)
    }

    async fn probe(&self, url: &str, cancel: &CancellationToken) -> Result<u64> {
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(Error::Cancelled { url: url.to_string() });
            }
            response = self.client.head(url) => response,
        }
        .map_err(|e| Error::Network {
            url:    url.to_string(),
            reason: e.to_string(),
        })?;

        if response.status != 200 {
            return Err(Error::RemoteUnavailable {
                url:    url.to_string(),
                status: response.status,
            });
        }

        match response.content_length {
            None => Err(Error::MissingContentLength {
                url: url.to_string(),
            }),
            Some(0) => Err(Error::EmptyResource {
                url: url.to_string(),
            }),
            Some(length) => Ok(length),
        }
    }

    fn spawn_segment(
        &self,
        url: &str,
        segment: Segment,
        cancel: CancellationToken,
    ) -> JoinHandle<std::result::Result<Bytes, String>> {
        let client = Arc::clone(&self.client);
        let url = url.to_string();
        let on_progress = self.options.on_progress.clone();

        tokio::spawn(async move {
            let body = tokio::select! {
                _ = cancel.cancelled() => Err("cancelled".to_string()),
                body = fetch_segment(client.as_ref(), &url, &segment) => body,
            }?;

            if let Some(callback) = on_progress {
                callback(Progress::Segment {
                    index: segment.index,
                    bytes: body.len() as u64,
                });
            }
            Ok(body)
        })
    }

    /// Concatenate `buffers` in index order into a staging file.
    fn assemble(&self, url: &str, buffers: &[Bytes]) -> Result<FetchedArchive> {
        let dir = &self.options.staging_dir;
        let staging = |source| Error::Staging {
            path: dir.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(staging)?;
        let mut tmp = tempfile::Builder::new()
            .prefix("gvs-")
            .suffix(archive_suffix(url))
            .tempfile_in(dir)
            .map_err(staging)?;

        for body in buffers {
            tmp.write_all(body).map_err(staging)?;
        }
        tmp.as_file().sync_all().map_err(staging)?;

        let (written, path) = tmp.keep().map_err(|e| staging(e.error))?;
        drop(written);

        let file = File::open(&path).map_err(|source| Error::Staging {
            path: path.clone(),
            source,
        })?;
        Ok(FetchedArchive { path, file })
    }

    fn notify(&self, progress: Progress) {
        if let Some(ref callback) = self.options.on_progress {
            callback(progress);
        }
    }
}

async fn fetch_segment<C: HttpClient>(
    client: &C,
    url: &str,
    segment: &Segment,
) -> std::result::Result<Bytes, String> {
    let response = client
        .get(url, Some(&segment.range_header()))
        .await
        .map_err(|e| e.to_string())?;

    if response.status != 206 {
        return Err(format!("response status is {}", response.status));
    }
    if response.body.len() as u64 != segment.len() {
        return Err(format!(
            "expected {} bytes, received {}",
            segment.len(),
            response.body.len()
        ));
    }
    Ok(response.body)
}

/// Archive suffix of the file named by `url`, kept on the staging file.
fn archive_suffix(url: &str) -> &'static str {
    let name = url.rsplit('/').next().unwrap_or(url);
    [".tar.gz", ".tgz", ".zip"]
        .into_iter()
        .find(|suffix| name.ends_with(suffix))
        .unwrap_or("")
}
