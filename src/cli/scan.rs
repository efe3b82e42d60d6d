//! The `scan` command: list, resolve and report.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::CliConfig;
use crate::auth::{Authenticator, ClientSecrets};
use crate::config::ScanConfig;
use crate::core::GdscanError;
use crate::drive::{DriveClient, DriveFile};
use crate::report::{self, ReportSummary};
use crate::resolver::PathResolver;
use crate::store::ItemStore;
use crate::utils::progress::{ProgressBar, progress_enabled};

/// Scan the account and write the shared-items report.
#[derive(Args, Debug)]
pub struct ScanCommand {
    /// Path of the CSV file to generate (`-` for standard output)
    #[arg(value_name = "CSVPATH")]
    csv_path: PathBuf,

    /// Path to the Google Drive client secrets (client ID) file [default: ~/client_id.json]
    #[arg(short = 's', long, value_name = "CLIENTSECRETSPATH")]
    client_secrets_path: Option<PathBuf>,

    /// Stop listing once more than LIMIT items have been collected
    #[arg(short = 'n', long, value_name = "LIMIT")]
    limit: Option<usize>,

    /// Configuration directory holding config.toml and the stored token [default: ~/.gdscan]
    #[arg(short = 'c', long, value_name = "CONFIGDIR")]
    config_dir: Option<PathBuf>,

    /// Overwrite the CSV file if it already exists
    #[arg(short = 'f', long)]
    overwrite: bool,
}

/// Where the report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    fn from_arg(path: &Path) -> Self {
        if path == Path::new("-") {
            Self::Stdout
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// Refuse to replace an existing file unless asked to.
    fn check_writable(&self, overwrite: bool) -> Result<(), GdscanError> {
        match self {
            Self::File(path) if path.exists() && !overwrite => Err(GdscanError::OutputExists {
                path: path.display().to_string(),
            }),
            _ => Ok(()),
        }
    }

    async fn write(&self, contents: &[u8]) -> Result<()> {
        match self {
            Self::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(contents).context("Failed to write report to stdout")?;
                stdout.flush().context("Failed to write report to stdout")
            }
            Self::File(path) => tokio::fs::write(path, contents)
                .await
                .with_context(|| format!("Failed to write report to {}", path.display())),
        }
    }
}

impl ScanCommand {
    /// Run the scan.
    ///
    /// The report is assembled in memory and only written once every shared item
    /// has been resolved, so a failed scan leaves no partial CSV behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the output exists (without `--overwrite`), the
    /// configuration or credentials are unusable, a Drive request fails, or any
    /// shared item cannot be resolved.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let destination = Destination::from_arg(&self.csv_path);
        destination.check_writable(self.overwrite)?;

        let mut config = ScanConfig::load(self.config_dir.as_deref()).await?;
        if let Some(path) = self.client_secrets_path {
            config.client_secrets_path = Some(path);
        }
        debug!("Configuration directory: {}", config.config_dir.display());

        let secrets = ClientSecrets::load(&config.client_secrets_path()).await?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;
        let token = Authenticator::new(secrets, config.token_path(), http)
            .access_token()
            .await
            .context("Failed to obtain Google Drive credentials")?;

        let client = DriveClient::new(token, &config)?;
        let show_progress = progress_enabled(cli.progress);

        let spinner = ProgressBar::new_spinner(show_progress);
        spinner.set_prefix("Listing");
        let files = client.list_files(self.limit, &spinner).await;
        spinner.finish_and_clear();
        let files = files.context("Failed to list Drive files")?;

        let (contents, summary) = render_report(client, &files, show_progress).await?;
        destination.write(&contents).await?;

        if let Destination::File(path) = &destination {
            info!(
                "Wrote {} shared items ({} paths) to {}",
                summary.shared_files,
                summary.paths,
                path.display()
            );
        }
        Ok(())
    }
}

async fn render_report(
    client: DriveClient,
    files: &[DriveFile],
    show_progress: bool,
) -> Result<(Vec<u8>, ReportSummary)> {
    let store = ItemStore::new(client, files.iter().map(DriveFile::to_record));
    let mut resolver = PathResolver::new(store);

    let shared = files.iter().filter(|f| f.shared).count();
    let bar = ProgressBar::new(shared as u64, show_progress);
    bar.set_prefix("Resolving");

    let mut contents = Vec::new();
    let summary = report::write_shared_items(&mut contents, &mut resolver, files, &bar).await;
    bar.finish_and_clear();
    Ok((contents, summary?))
}
