use anyhow::{Context, Result};
use clap::Parser;
use gvs_fetch::CancellationToken;
use tracing::debug;

use crate::cli::App;
use crate::ctx::Ctx;

mod cli;
mod ctx;
mod logging;
mod tracker;

fn main() {
    let app = App::parse();
    let verbosity = app.verbosity();
    logging::init(verbosity);

    let code = match start(app, verbosity) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[gvs] {:#}", e);
            1
        }
    };
    std::process::exit(code);
}

fn start(app: App, verbosity: logging::Verbosity) -> Result<i32> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async move {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupted");
                on_interrupt.cancel();
            }
        });

        let ctx = Ctx::load(verbosity, cancel)?;
        cli::dispatch(app.cmd, &ctx).await
    })
}
