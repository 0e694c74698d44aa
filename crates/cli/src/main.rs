mod progress;
mod upload;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gcp-upload",
    version,
    about = "Upload a file to a Google Cloud Storage bucket unless it is already there"
)]
struct Cli {
    #[command(flatten)]
    upload: upload::UploadArgs,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    // stdout is reserved for the skip notice and the URL
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    upload::run(cli.upload, cli.verbose).await
}
