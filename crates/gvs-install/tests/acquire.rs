use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use gvs_fetch::{CancellationToken, HttpClient, Response};
use gvs_install::{Acquirer, Error, Layout, Platform, Settings, list_local};
use gvs_version::VersionPattern;

const LISTING_URL: &str = "https://listing.test/dl/?mode=json&include=all";
const DOWNLOAD_URL: &str = "https://dl.test/golang";
const ARCHIVE_URL: &str = "https://dl.test/golang/go1.22.3.linux-amd64.tar.gz";

const LISTING: &str = r#"[
    {"version": "go1.23rc1", "stable": false, "files": [
        {"filename": "go1.23rc1.linux-amd64.tar.gz", "os": "linux", "arch": "amd64", "version": "go1.23rc1", "sha256": "", "size": 0, "kind": "archive"}
    ]},
    {"version": "go1.22.3", "stable": true, "files": [
        {"filename": "go1.22.3.linux-amd64.tar.gz", "os": "linux", "arch": "amd64", "version": "go1.22.3", "sha256": "", "size": 0, "kind": "archive"},
        {"filename": "go1.22.3.darwin-arm64.tar.gz", "os": "darwin", "arch": "arm64", "version": "go1.22.3", "sha256": "", "size": 0, "kind": "archive"}
    ]},
    {"version": "go1.21.10", "stable": true, "files": []}
]"#;

#[derive(Debug, thiserror::Error)]
#[error("no route to {0}")]
struct Unreachable(String);

/// Serves fixed bodies by URL, honouring byte ranges.
#[derive(Default)]
struct FakeRemote {
    bodies:      HashMap<String, Bytes>,
    fail_ranges: AtomicBool,
    requests:    Arc<Mutex<Vec<String>>>,
}

impl FakeRemote {
    fn new() -> Self {
        let mut remote = Self::default();
        remote.bodies.insert(LISTING_URL.into(), Bytes::from_static(LISTING.as_bytes()));
        remote.bodies.insert(ARCHIVE_URL.into(), Bytes::from(toolchain_archive()));
        remote
    }

    fn body(&self, url: &str) -> Result<Bytes, Unreachable> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies.get(url).cloned().ok_or_else(|| Unreachable(url.to_string()))
    }
}

impl HttpClient for FakeRemote {
    type Error = Unreachable;

    async fn head(&self, url: &str) -> Result<Response, Unreachable> {
        let body = self.body(url)?;
        Ok(Response {
            status:         200,
            content_length: Some(body.len() as u64),
            body:           Bytes::new(),
        })
    }

    async fn get(&self, url: &str, range: Option<&str>) -> Result<Response, Unreachable> {
        let body = self.body(url)?;
        let Some(range) = range else {
            return Ok(Response {
                status:         200,
                content_length: Some(body.len() as u64),
                body,
            });
        };
        if self.fail_ranges.load(Ordering::SeqCst) {
            return Ok(Response {
                status:         503,
                content_length: None,
                body:           Bytes::new(),
            });
        }

        let (start, end) = range.trim_start_matches("bytes=").split_once('-').unwrap();
        let start: usize = start.parse().unwrap();
        let end = if end.is_empty() { body.len() } else { end.parse::<usize>().unwrap() + 1 };
        let slice = body.slice(start..end);
        Ok(Response {
            status:         206,
            content_length: Some(slice.len() as u64),
            body:           slice,
        })
    }
}

fn toolchain_archive() -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let files: [(&str, &[u8], u32); 3] = [
        ("go/VERSION", b"go1.22.3\n", 0o644),
        ("go/bin/go", b"#!/bin/sh\necho go1.22.3\n", 0o755),
        ("go/bin/gofmt", b"#!/bin/sh\n", 0o755),
    ];
    for (path, content, mode) in files {
        let mut header = tar::Header::new_gnu();
        header.set_mode(mode);
        header.set_size(content.len() as u64);
        builder.append_data(&mut header, path, content).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn settings() -> Settings {
    Settings {
        listing_url: LISTING_URL.into(),
        download_url: DOWNLOAD_URL.into(),
        workers_per_cpu: 1,
        include_unstable: true,
    }
}

fn acquirer(layout: &Layout) -> Acquirer<FakeRemote> {
    Acquirer::new(FakeRemote::new(), layout.clone(), settings())
        .with_platform(Platform::new("linux", "amd64"))
}

fn pattern(raw: &str) -> VersionPattern { VersionPattern::parse(raw).unwrap() }

fn initialized() -> (tempfile::TempDir, Layout) {
    let temp = tempfile::tempdir().unwrap();
    let layout = Layout::new(temp.path().join(".gvs"));
    layout.init().unwrap();
    (temp, layout)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ensure_installed_downloads_then_reuses() {
    let (_temp, layout) = initialized();
    let remote = FakeRemote::new();
    let requests = Arc::clone(&remote.requests);
    let acquirer = Acquirer::new(remote, layout.clone(), settings())
        .with_platform(Platform::new("linux", "amd64"));
    let cancel = CancellationToken::new();

    let name = acquirer.ensure_installed(&pattern("1.22"), &cancel).await.unwrap();

    assert_eq!(name, "1.22.3");
    assert_eq!(
        fs::read_to_string(layout.version_dir("1.22.3").join("VERSION")).unwrap(),
        "go1.22.3\n"
    );
    assert!(layout.executable("1.22.3", "go").is_file());
    assert_eq!(fs::read_dir(layout.tmp_dir()).unwrap().count(), 0);

    let seen = requests.lock().unwrap().len();
    assert!(seen >= 3);
    let again = acquirer.ensure_installed(&pattern("1.22"), &cancel).await.unwrap();
    assert_eq!(again, "1.22.3");
    assert_eq!(requests.lock().unwrap().len(), seen);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn acquire_replaces_stale_version() {
    let (_temp, layout) = initialized();
    let stale = layout.version_dir("1.22.3");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("leftover"), "").unwrap();

    let name = acquirer(&layout)
        .acquire(&pattern("1.22.3"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(name, "1.22.3");
    assert!(!stale.join("leftover").exists());
    assert!(stale.join("VERSION").is_file());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn acquire_major_only_prefers_stable_over_newer_rc() {
    let (_temp, layout) = initialized();

    let name = acquirer(&layout)
        .acquire(&pattern("1"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(name, "1.22.3");
    assert_eq!(list_local(&layout).unwrap(), vec!["1.22.3"]);
}

#[tokio::test]
async fn acquire_without_platform_archive() {
    let (_temp, layout) = initialized();
    let acquirer = Acquirer::new(FakeRemote::new(), layout.clone(), settings())
        .with_platform(Platform::new("windows", "amd64"));

    let err = acquirer
        .acquire(&pattern("1.22"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoArtifact { ref os, .. } if os == "windows"));
    assert!(list_local(&layout).unwrap().is_empty());
}

#[tokio::test]
async fn acquire_requires_init() {
    let temp = tempfile::tempdir().unwrap();
    let layout = Layout::new(temp.path().join("missing"));

    let err = acquirer(&layout)
        .acquire(&pattern("1.22"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotInitialized(_)));
}

#[tokio::test]
async fn acquire_unknown_version() {
    let (_temp, layout) = initialized();

    let err = acquirer(&layout)
        .acquire(&pattern("1.5"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Version(gvs_version::Error::NoMatch(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn acquire_partial_fetch_registers_nothing() {
    let (_temp, layout) = initialized();
    let remote = FakeRemote::new();
    remote.fail_ranges.store(true, Ordering::SeqCst);
    let acquirer = Acquirer::new(remote, layout.clone(), settings())
        .with_platform(Platform::new("linux", "amd64"));

    let err = acquirer
        .acquire(&pattern("1.22"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Fetch(gvs_fetch::Error::PartialFetch { .. })));
    assert!(list_local(&layout).unwrap().is_empty());
    assert_eq!(fs::read_dir(layout.tmp_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn releases_respect_unstable_setting() {
    let (_temp, layout) = initialized();
    let cancel = CancellationToken::new();

    let all = acquirer(&layout).releases(&cancel).await.unwrap();
    assert_eq!(all.len(), 3);

    let stable_only = Acquirer::new(
        FakeRemote::new(),
        layout.clone(),
        Settings {
            include_unstable: false,
            ..settings()
        },
    );
    let stable = stable_only.releases(&cancel).await.unwrap();
    assert!(stable.iter().all(|r| r.stable));
    assert_eq!(stable.len(), 2);
}
