use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::ctx::Ctx;
use crate::logging::Verbosity;

pub mod download;
pub mod init;
pub mod install;
pub mod run;
pub mod use_ver;
pub mod versions;

#[derive(Clone, Debug, Parser)]
#[command(name = "gvs", version = env!("CARGO_PKG_VERSION"), about = "Go version switcher", long_about = None)]
pub struct App {
    /// Output debug log
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Initialize gvs")]
    Init,
    #[command(name = "use", about = "Select Go version")]
    Use(use_ver::UseArg),
    #[command(about = "Download specified versions of Go")]
    Download(download::DownloadArg),
    #[command(about = "Run go or gofmt with the selected version")]
    Run(run::RunArg),
    #[command(about = "Install tools with the global Go version")]
    Install(install::InstallArg),
    #[command(alias = "ls", about = "List versions")]
    Versions(versions::VersionsArg),
}

impl App {
    /// `run` stays quiet unless asked, so a shimmed `go` prints only its own
    /// output.
    pub fn verbosity(&self) -> Verbosity {
        match &self.cmd {
            Commands::Run(arg) => Verbosity::from_flags(self.debug, arg.verbose),
            _ => Verbosity::from_flags(self.debug, true),
        }
    }
}

/// Run the selected command, returning the process exit code.
pub async fn dispatch(cmd: Commands, ctx: &Ctx) -> Result<i32> {
    match cmd {
        Commands::Init => init::init(ctx).map(|_| 0),
        Commands::Use(arg) => use_ver::use_ver(ctx, arg).map(|_| 0),
        Commands::Download(arg) => download::download(ctx, arg).await.map(|_| 0),
        Commands::Run(arg) => run::run(ctx, arg).await,
        Commands::Install(arg) => install::install(ctx, arg).await,
        Commands::Versions(arg) => versions::versions(ctx, arg).await.map(|_| 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_app_definition() { App::command().debug_assert(); }

    #[test]
    fn test_run_is_quiet_by_default() {
        let app = App::try_parse_from(["gvs", "run", "go", "--", "version"]).unwrap();
        assert_eq!(app.verbosity(), Verbosity::Quiet);

        let app = App::try_parse_from(["gvs", "run", "-v", "go", "--", "version"]).unwrap();
        assert_eq!(app.verbosity(), Verbosity::Normal);

        let app = App::try_parse_from(["gvs", "--debug", "versions"]).unwrap();
        assert_eq!(app.verbosity(), Verbosity::Debug);
    }

    #[test]
    fn test_parse_use() {
        let app = App::try_parse_from(["gvs", "use", "1.22", "--local"]).unwrap();
        match app.cmd {
            Commands::Use(arg) => {
                assert_eq!(arg.version, "1.22");
                assert!(arg.local);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_download_requires_version() {
        assert!(App::try_parse_from(["gvs", "download"]).is_err());
    }
}
