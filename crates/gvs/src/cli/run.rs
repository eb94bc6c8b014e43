use std::process::Command;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use gvs_resolve::Error as ResolveError;
use gvs_version::VersionPattern;
use tracing::debug;

use crate::ctx::Ctx;

const AUTO_VERSION: &str = "auto";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Go,
    Gofmt,
}

impl Tool {
    pub fn command(self) -> &'static str {
        match self {
            Tool::Go => "go",
            Tool::Gofmt => "gofmt",
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct RunArg {
    pub tool:    Tool,

    /// Version to run, or `auto` to resolve it from the working directory
    #[arg(long, default_value = AUTO_VERSION)]
    pub version: String,

    /// Output verbose log
    #[arg(short, long)]
    pub verbose: bool,

    /// Arguments passed to the tool
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args:    Vec<String>,
}

pub async fn run(ctx: &Ctx, arg: RunArg) -> Result<i32> {
    ctx.layout.ensure_initialized()?;

    let raw = if arg.version == AUTO_VERSION {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        let decision = ctx.layout.resolver().decide(&cwd).map_err(no_version_hint)?;
        debug!("{} decided by {}", decision.raw, decision.source.path().display());
        decision.raw
    } else {
        arg.version
    };

    exec_installed(ctx, &raw, arg.tool, &arg.args).await
}

/// Run `tool` from the installed version matching `raw`, downloading it if
/// needed, and return its exit code.
pub async fn exec_installed(ctx: &Ctx, raw: &str, tool: Tool, args: &[String]) -> Result<i32> {
    let pattern = VersionPattern::parse(raw)?;
    let tracker = ctx.tracker(raw);
    let installed = ctx.acquirer(&tracker)?.ensure_installed(&pattern, &ctx.cancel).await;
    tracker.finish();
    let name = installed?;

    let executable = ctx.layout.executable(&name, tool.command());
    debug!("use {}", executable.display());

    let mut command = Command::new(&executable);
    command.args(args);
    let status = tokio::task::spawn_blocking(move || command.status())
        .await?
        .with_context(|| format!("failed to run {}", executable.display()))?;

    Ok(status.code().unwrap_or(1))
}

fn no_version_hint(e: ResolveError) -> anyhow::Error {
    match e {
        ResolveError::NoVersionConfigured(_) => {
            anyhow::Error::new(e).context("no version selected, run `gvs use <version>`")
        }
        other => other.into(),
    }
}
