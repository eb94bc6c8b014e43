use std::sync::Arc;

use gvs_fetch::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const PB_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

/// Renders download progress events as a byte progress bar.
pub struct DownloadTracker {
    pb: ProgressBar,
}

impl DownloadTracker {
    pub fn new(prefix: &str, visible: bool) -> Self {
        let pb = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        pb.set_prefix(prefix.to_string());
        Self { pb }
    }

    pub fn observer(&self) -> ProgressCallback {
        let pb = self.pb.clone();
        Arc::new(move |event: Progress| match event {
            Progress::Probed { total, .. } => pb.set_length(total),
            Progress::Segment { bytes, .. } => pb.inc(bytes),
            Progress::Assembled { .. } => pb.finish_and_clear(),
        })
    }

    pub fn finish(self) {
        if !self.pb.is_finished() {
            self.pb.abandon();
        }
    }
}
