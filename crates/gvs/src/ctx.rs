use anyhow::{Context, Result};
use gvs_fetch::{CancellationToken, ReqwestClient};
use gvs_install::{Acquirer, Layout, Settings};

use crate::logging::Verbosity;
use crate::tracker::DownloadTracker;

/// What every command runs against.
pub struct Ctx {
    pub layout:    Layout,
    pub settings:  Settings,
    pub verbosity: Verbosity,
    pub cancel:    CancellationToken,
}

impl Ctx {
    pub fn load(verbosity: Verbosity, cancel: CancellationToken) -> Result<Self> {
        let layout = Layout::from_env()?;
        let settings = Settings::load(&layout.config_file())
            .with_context(|| format!("failed to read {}", layout.config_file().display()))?;

        Ok(Self {
            layout,
            settings,
            verbosity,
            cancel,
        })
    }

    /// An acquirer reporting download progress to `tracker`.
    pub fn acquirer(&self, tracker: &DownloadTracker) -> Result<Acquirer<ReqwestClient>> {
        let client = ReqwestClient::new().context("failed to build http client")?;
        Ok(
            Acquirer::new(client, self.layout.clone(), self.settings.clone())
                .with_progress(tracker.observer()),
        )
    }

    pub fn tracker(&self, prefix: &str) -> DownloadTracker {
        DownloadTracker::new(prefix, self.verbosity.shows_progress())
    }
}
