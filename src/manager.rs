use crate::downloader::Downloader;
use crate::error::{BASE_URL_REQUIRED, DownloadError, MANIFEST_URL_REQUIRED, Result};
use crate::manifest::ManifestFetcher;
use crate::progress::{ProgressSink, ProgressUnit};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Key of the bar counting processed manifest entries.
pub const TOTAL_KEY: &str = "Total";

/// Drives a whole batch: fetch the manifest, then download every entry in
/// order, one at a time.
pub struct DownloadManager {
    manifest: ManifestFetcher,
    downloader: Downloader,
    progress: Arc<dyn ProgressSink>,
}

impl DownloadManager {
    pub fn new(
        manifest: ManifestFetcher,
        downloader: Downloader,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            manifest,
            downloader,
            progress,
        }
    }

    /// Returns the paths of the files that were written, in manifest order.
    ///
    /// Only input errors and manifest failures are returned. A file that
    /// fails to download is logged and left out of the result.
    pub async fn download_files_from_json(
        &self,
        manifest_url: &str,
        base_url: &str,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        if manifest_url.is_empty() {
            error!("Download process failed: JSON file URL is missing");
            return Err(DownloadError::Input(MANIFEST_URL_REQUIRED));
        }

        if base_url.is_empty() {
            error!("Download process failed: Base URL is missing");
            return Err(DownloadError::Input(BASE_URL_REQUIRED));
        }

        info!("Starting download process from JSON file: {}", manifest_url);
        info!("Using base URL: {}", base_url);
        info!("Files will be saved to: {}", output_dir.display());

        let files = match self.manifest.retrieve_file_list(manifest_url).await {
            Ok(files) => files,
            Err(e) => {
                error!("Download process failed: {}", e);
                return Err(e);
            }
        };
        info!("Retrieved {} files from JSON", files.len());

        if files.is_empty() {
            warn!("No files found in the JSON file");
            return Ok(Vec::new());
        }

        self.progress
            .create(TOTAL_KEY, files.len() as u64, ProgressUnit::Files);

        let mut downloaded = Vec::with_capacity(files.len());

        for file in &files {
            info!("Processing file: {} ({})", file.name(), file.uid());

            match self.downloader.download_file(file, base_url, output_dir).await {
                Ok(path) => {
                    downloaded.push(path);
                    info!("Successfully downloaded: {}", file.name());
                }
                Err(e) => {
                    error!("Failed to download file {}: {}", file.name(), e);
                }
            }

            self.progress.increment(TOTAL_KEY, 1);
        }

        self.progress.stop();

        info!(
            "Download process completed. Successfully downloaded {} of {} files",
            downloaded.len(),
            files.len()
        );

        Ok(downloaded)
    }
}
