use anyhow::{Context, Result};
use clap::Args;
use gvs_install::{normalize, write_local};
use gvs_version::VersionPattern;
use tracing::info;

use crate::ctx::Ctx;

#[derive(Args, Clone, Debug)]
pub struct UseArg {
    /// Version to select, e.g. `1.22` or `go1.21.5`
    pub version: String,

    /// Select for the current directory instead of globally
    #[arg(long)]
    pub local:   bool,
}

pub fn use_ver(ctx: &Ctx, arg: UseArg) -> Result<()> {
    VersionPattern::parse(&arg.version)?;

    let path = if arg.local {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        write_local(&cwd, &arg.version)?
    } else {
        ctx.layout.ensure_initialized()?;
        ctx.layout.write_global(&arg.version)?
    };

    info!("use {} ({})", normalize(&arg.version), path.display());
    Ok(())
}
