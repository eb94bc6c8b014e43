use std::fmt::Write;

use anyhow::{Context, Result};
use clap::Args;
use gvs_install::{Error as InstallError, find_local, list_local};
use gvs_resolve::Error as ResolveError;
use gvs_version::VersionPattern;
use tracing::debug;

use crate::ctx::Ctx;

#[derive(Args, Clone, Debug)]
pub struct VersionsArg {
    /// List every published version instead of installed ones
    #[arg(long)]
    pub remote: bool,
}

pub async fn versions(ctx: &Ctx, arg: VersionsArg) -> Result<()> {
    let out = if arg.remote {
        remote(ctx).await?
    } else {
        local(ctx)?
    };
    print!("{}", out);
    Ok(())
}

async fn remote(ctx: &Ctx) -> Result<String> {
    let tracker = ctx.tracker("listing");
    let releases = ctx.acquirer(&tracker)?.releases(&ctx.cancel).await?;
    tracker.finish();

    let mut out = String::new();
    for release in releases {
        writeln!(out, "{}", release.version)?;
    }
    Ok(out)
}

fn local(ctx: &Ctx) -> Result<String> {
    ctx.layout.ensure_initialized()?;
    let installed = list_local(&ctx.layout)?;

    let resolver = ctx.layout.resolver();
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let current = installed_match(ctx, resolver.decide(&cwd).map(|d| d.raw))?;
    let global = installed_match(ctx, resolver.global().map(|d| d.raw))?;

    let mut out = String::new();
    for name in &installed {
        writeln!(out, "{} {}", marker(name, global.as_deref(), current.as_deref()), name)?;
    }
    out.push_str("\n-global +current *both\n");
    Ok(out)
}

/// The installed version a resolved setting points at, if any.
fn installed_match(ctx: &Ctx, raw: gvs_resolve::Result<String>) -> Result<Option<String>> {
    let raw = match raw {
        Ok(raw) => raw,
        Err(ResolveError::NoVersionConfigured(path)) => {
            debug!("no version configured ({})", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    match find_local(&ctx.layout, &VersionPattern::parse(&raw)?) {
        Ok(name) => Ok(Some(name)),
        Err(InstallError::Version(gvs_version::Error::NoMatch(_))) => {
            debug!("{} is not installed", raw);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn marker(name: &str, global: Option<&str>, current: Option<&str>) -> char {
    match (global == Some(name), current == Some(name)) {
        (true, true) => '*',
        (true, false) => '-',
        (false, true) => '+',
        (false, false) => ' ',
    }
}
