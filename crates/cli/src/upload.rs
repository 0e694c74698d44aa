use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::ProgressBar;
use tracing::info;

use gcp_upload_core::{
    BucketUploader, CREDENTIALS_ENV, Credentials, FromCredentials, StorageClient,
};
use gcp_upload_storage::{EMULATOR_HOST_ENV, GcsClient, GcsConfig};

use crate::progress;

const SKIP_NOTICE: &str = "File already exists, skipping upload";

#[derive(Args)]
pub struct UploadArgs {
    /// Name of an existing bucket
    pub bucket_name: String,

    /// Local file to upload; the object is named after its final component
    pub filename: PathBuf,
}

pub async fn run(args: UploadArgs, verbose: bool) -> Result<()> {
    let emulator_host = std::env::var(EMULATOR_HOST_ENV).ok();
    let client = connect(
        Credentials::from_env(CREDENTIALS_ENV),
        emulator_host.as_deref(),
    )?;
    let uploader = BucketUploader::new(client);

    // log lines and a ticking spinner would interleave on stderr
    let spinner = if verbose {
        ProgressBar::hidden()
    } else {
        progress::create_spinner(&format!(
            "Uploading {} to gs://{}...",
            args.filename.display(),
            args.bucket_name
        ))
    };
    let mut stdout = std::io::stdout();
    execute(&uploader, &args, &spinner, &mut stdout).await
}

/// Build the storage client. Credentials must have loaded before anything
/// else is attempted.
fn connect(
    credentials: gcp_upload_core::Result<Credentials>,
    emulator_host: Option<&str>,
) -> Result<GcsClient> {
    let credentials = credentials
        .with_context(|| format!("failed to load credentials from {CREDENTIALS_ENV}"))?;

    let client = match emulator_host.map(str::trim).filter(|host| !host.is_empty()) {
        Some(host) => {
            info!(host = %host, "Using storage emulator");
            GcsClient::new(GcsConfig::emulator(host)?, &credentials)?
        }
        None => GcsClient::from_credentials(&credentials)
            .context("failed to create storage client")?,
    };
    info!(account = %credentials.client_email(), "Storage client ready");
    Ok(client)
}

/// Run the upload and report on `out`: the skip notice if nothing was sent,
/// then the public URL.
async fn execute<C: StorageClient>(
    uploader: &BucketUploader<C>,
    args: &UploadArgs,
    progress: &ProgressBar,
    out: &mut impl Write,
) -> Result<()> {
    let result = uploader
        .upload_to_bucket(&args.bucket_name, &args.filename)
        .await;
    progress.finish_and_clear();

    let outcome = result.with_context(|| {
        format!(
            "failed to upload {} to bucket {}",
            args.filename.display(),
            args.bucket_name
        )
    })?;

    if outcome.skipped() {
        writeln!(out, "{SKIP_NOTICE}")?;
    }
    writeln!(out, "{}", outcome.public_url)?;
    Ok(())
}
