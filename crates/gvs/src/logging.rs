use tracing_subscriber::EnvFilter;

/// How much the binary reports, chosen from command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
}

impl Verbosity {
    pub fn from_flags(debug: bool, verbose: bool) -> Self {
        match (debug, verbose) {
            (true, _) => Verbosity::Debug,
            (false, true) => Verbosity::Normal,
            (false, false) => Verbosity::Quiet,
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Debug => "debug",
        }
    }

    pub fn shows_progress(self) -> bool { self > Verbosity::Quiet }
}

/// Install the stderr subscriber. `RUST_LOG` overrides `verbosity`.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity == Verbosity::Debug)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
