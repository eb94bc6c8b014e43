use anyhow::{Context, Result};
use clap::Args;
use gvs_version::VersionPattern;

use crate::ctx::Ctx;

#[derive(Args, Clone, Debug)]
pub struct DownloadArg {
    /// Versions to download
    #[arg(required = true)]
    pub versions: Vec<String>,
}

pub async fn download(ctx: &Ctx, arg: DownloadArg) -> Result<()> {
    for raw in &arg.versions {
        let pattern = VersionPattern::parse(raw)?;
        let tracker = ctx.tracker(raw);
        let acquired = ctx.acquirer(&tracker)?.acquire(&pattern, &ctx.cancel).await;
        tracker.finish();

        let name = acquired.with_context(|| format!("failed to download {}", raw))?;
        println!("{}", name);
    }
    Ok(())
}
