use anyhow::Result;
use clap::Parser;
use gs_download::{
    DownloadManager, Downloader, ManifestFetcher, ProgressManager, ProgressSink, build_client,
    logging,
};
use std::sync::Arc;
use tracing::{error, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Help and argument errors exit here, before anything touches the network.
    let args = Args::parse();

    let _log_guard = logging::init(args.log_dir.as_deref())?;

    let base_url = args.base_url();
    let manifest_url = args.manifest_url();

    info!("Connecting to {}:{}", args.host, args.port);
    info!("Target directory: {}", args.target.display());

    let client = build_client()?;
    let progress: Arc<dyn ProgressSink> = Arc::new(ProgressManager::new());
    let manager = DownloadManager::new(
        ManifestFetcher::new(client.clone()),
        Downloader::new(client, Arc::clone(&progress)),
        progress,
    );

    match manager
        .download_files_from_json(&manifest_url, &base_url, &args.target)
        .await
    {
        Ok(downloaded) => {
            info!("Download completed. {} files downloaded.", downloaded.len());
            println!("{} files downloaded to {}", downloaded.len(), args.target.display());
            Ok(())
        }
        Err(e) => {
            error!("Download failed: {}", e);
            Err(e.into())
        }
    }
}
