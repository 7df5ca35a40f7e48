//! Shared setup for the compatibility command-line tools

#![warn(missing_docs)]

use tracing_subscriber::EnvFilter;

/// Log verbosity requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `RUST_LOG`, or warnings only
    #[default]
    Normal,
    /// `-v`: debug
    Verbose,
    /// `--quiet`: errors only
    Quiet,
}

impl Verbosity {
    /// From the `verbose` and `quiet` flags
    #[must_use]
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Self::Verbose,
            (false, true) => Self::Quiet,
            (false, false) => Self::Normal,
        }
    }

    fn filter(self) -> EnvFilter {
        match self {
            Self::Verbose => EnvFilter::new("debug"),
            Self::Quiet => EnvFilter::new("error"),
            Self::Normal => {
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
            }
        }
    }
}

/// Initialize tracing on stderr so stdout carries only the report
pub fn init_tracing(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(verbosity.filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
