use anyhow::Result;
use clap::Args;

use super::run::{Tool, exec_installed};
use crate::ctx::Ctx;

#[derive(Args, Clone, Debug)]
pub struct InstallArg {
    /// Arguments passed to `go install`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// `go install` with the globally selected version.
pub async fn install(ctx: &Ctx, arg: InstallArg) -> Result<i32> {
    ctx.layout.ensure_initialized()?;
    let global = ctx.layout.resolver().global()?;

    let mut args = Vec::with_capacity(arg.args.len() + 1);
    args.push("install".to_string());
    args.extend(arg.args);
    exec_installed(ctx, &global.raw, Tool::Go, &args).await
}
