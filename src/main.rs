//! drivecast - stream audio from a Google Drive folder over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drivecast::server::{self, AppState};
use drivecast::{extract_folder_id, Authenticator, DriveClient};

/// HTTP relay for audio files stored in a Google Drive folder.
#[derive(Parser)]
#[command(name = "drivecast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to service account JSON credentials file.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: PathBuf,

    /// Drive folder URL or ID containing the audio files.
    #[arg(long, env = "DRIVECAST_FOLDER")]
    folder: String,

    /// Port to listen on.
    #[arg(long, env = "DRIVECAST_PORT", default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drivecast=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let auth = Authenticator::from_file(&cli.credentials)
        .with_context(|| format!("Failed to load credentials from {:?}", cli.credentials))?;

    let folder_id = extract_folder_id(&cli.folder)
        .with_context(|| format!("Invalid folder URL or ID: {}", cli.folder))?;

    info!("Serving Drive folder {}", folder_id);

    let client = DriveClient::new(Arc::new(auth), folder_id);

    server::run(cli.port, AppState { client }).await
}
