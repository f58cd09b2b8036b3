use crate::error::{BASE_URL_REQUIRED, DownloadError, FILE_UID_REQUIRED, Result};
use crate::models::FileDescriptor;
use crate::progress::{ProgressSink, ProgressUnit};
use futures::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Response, StatusCode};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, error, info, warn};

/// Streams single files from the host's `/files/<uid>` endpoint to disk.
#[derive(Clone)]
pub struct Downloader {
    client: Client,
    progress: Arc<dyn ProgressSink>,
}

impl Downloader {
    pub fn new(client: Client, progress: Arc<dyn ProgressSink>) -> Self {
        Self { client, progress }
    }

    /// Downloads one file into `output_dir` as `<simplified name>.pdf` and
    /// returns the written path.
    ///
    /// A bar keyed by the file's labeled name tracks received bytes when the
    /// server announces a content length. The bar is removed whatever the
    /// outcome, and a partially written file is deleted on failure.
    pub async fn download_file(
        &self,
        file: &FileDescriptor,
        base_url: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        if file.uid().is_empty() {
            error!("Download failed: File UID is missing");
            return Err(DownloadError::Input(FILE_UID_REQUIRED));
        }

        if base_url.is_empty() {
            error!("Download failed: Base URL is missing");
            return Err(DownloadError::Input(BASE_URL_REQUIRED));
        }

        info!("Starting download for file with UID: {}", file.uid());
        info!("Using base URL: {}", base_url);

        let dir_exists = fs::try_exists(output_dir)
            .await
            .map_err(|e| DownloadError::Transfer(e.to_string()))?;
        if !dir_exists {
            info!("Creating output directory: {}", output_dir.display());
            fs::create_dir_all(output_dir)
                .await
                .map_err(|e| DownloadError::Transfer(e.to_string()))?;
        }

        let download_url = file_url(base_url, file.uid());
        let output_path = output_dir.join(output_file_name(file.simplified_name()));

        info!("Download URL: {}", download_url);
        info!("Output file path: {}", output_path.display());

        let label = file.labeled_name();
        let result = self.transfer(&download_url, &output_path, label).await;

        // Removing a bar that was never created is a no-op.
        self.progress.remove(label);

        result.map(|()| output_path)
    }

    async fn transfer(&self, url: &str, output_path: &Path, label: &str) -> Result<()> {
        info!("Initiating download request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::Transfer(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(DownloadError::Transfer(response.status().as_u16().to_string()));
        }

        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        if content_length > 0 {
            self.progress.create(label, content_length, ProgressUnit::Bytes);
        }

        if let Err(e) = self.write_body(response, output_path, label).await {
            if let Err(cleanup) = remove_partial_file(output_path).await {
                warn!(
                    "Could not remove partial file {}: {}",
                    output_path.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        if content_length > 0 {
            self.progress.set(label, content_length);
        }

        Ok(())
    }

    async fn write_body(&self, response: Response, output_path: &Path, label: &str) -> Result<()> {
        let file = File::create(output_path)
            .await
            .map_err(|e| DownloadError::Transfer(e.to_string()))?;
        let mut writer = BufWriter::new(file);

        let mut written = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DownloadError::Transfer(e.to_string()))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| DownloadError::Transfer(e.to_string()))?;

            written += chunk.len() as u64;
            self.progress.increment(label, chunk.len() as u64);
        }

        writer
            .shutdown()
            .await
            .map_err(|e| DownloadError::Transfer(e.to_string()))?;

        debug!("Wrote {} bytes to {}", written, output_path.display());
        Ok(())
    }
}

/// Deletes what a failed transfer left behind. A file that was never
/// created is not an error.
async fn remove_partial_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Joins the base URL and the file endpoint without doubling the slash.
pub fn file_url(base_url: &str, uid: &str) -> String {
    format!("{}/files/{}", base_url.trim_end_matches('/'), uid)
}

/// `<name>.pdf`, with path separators replaced so the file stays inside the
/// output directory.
pub fn output_file_name(simplified_name: &str) -> String {
    let flat: String = simplified_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{flat}.pdf")
}
