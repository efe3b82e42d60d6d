//! Command-line interface for gdscan.
//!
//! # Available Commands
//!
//! - `scan` - List the account's items, resolve every path of each shared item and
//!   write the report CSV
//! - `decode` - Turn encoded paths from a report back into readable names
//!
//! # Usage
//!
//! ```bash
//! # Full scan, authorizing in the browser on first use
//! gdscan scan shared.csv
//!
//! # Quick look at the first few hundred items, replacing an earlier report
//! gdscan scan shared.csv --limit 200 --overwrite
//!
//! # Report to stdout, logs only on errors
//! gdscan --quiet scan -
//!
//! # Read a value from the paths column
//! gdscan decode 'My Drive/Reports\572024/Q1\54 draft'
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--no-progress` - Disable progress indicators
//!
//! Logs are written to stderr, so `scan -` produces clean CSV on stdout. `RUST_LOG`
//! takes precedence over the level selected by the flags.

mod decode;
mod scan;

pub use decode::DecodeCommand;
pub use scan::ScanCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,

    /// Whether progress indicators may be drawn.
    pub progress: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            progress: true,
        }
    }
}

impl CliConfig {
    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("gdscan={}", self.log_level)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }
}

/// Report every item shared from a Google Drive account.
#[derive(Parser)]
#[command(
    name = "gdscan",
    about = "Report every item shared from a Google Drive account",
    version,
    long_about = "gdscan lists the items of a Google Drive account and writes a CSV report of \
                  every shared item with all of its folder paths, owners and grants."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable progress bars and spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the account and write the shared-items report.
    Scan(ScanCommand),

    /// Decode encoded paths taken from a report.
    Decode(DecodeCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` renders it for the user.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            progress: !self.no_progress && !self.quiet,
        }
    }

    /// Execute with an explicit configuration; logging is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Scan(cmd) => cmd.execute(&config).await,
            Commands::Decode(cmd) => cmd.execute(),
        }
    }
}
