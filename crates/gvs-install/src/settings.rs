use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_LISTING_URL: &str = "https://go.dev/dl/?mode=json&include=all";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://storage.googleapis.com/golang/";

/// Tunables read from defaults, `<root>/config.toml` and `GVS_*` variables,
/// later sources winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON listing of every published release.
    pub listing_url:      String,
    /// Base URL archives are downloaded from.
    pub download_url:     String,
    /// Range requests per logical CPU.
    pub workers_per_cpu:  usize,
    /// Whether release candidates and betas may be selected.
    pub include_unstable: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listing_url:      DEFAULT_LISTING_URL.to_string(),
            download_url:     DEFAULT_DOWNLOAD_URL.to_string(),
            workers_per_cpu:  4,
            include_unstable: true,
        }
    }
}

impl Settings {
    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("GVS_").only(&[
                "listing_url",
                "download_url",
                "workers_per_cpu",
                "include_unstable",
            ]))
    }

    pub fn load(config_file: &Path) -> Result<Self> { Ok(Self::figment(config_file).extract()?) }
}
