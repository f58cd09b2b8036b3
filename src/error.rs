use thiserror::Error;

/// Failures raised by the manifest fetcher, the downloader and the manager.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// A required argument was empty. Raised before any I/O.
    #[error("{0}")]
    Input(&'static str),

    /// The manifest could not be fetched or did not have the expected shape.
    #[error("Failed to retrieve file list: {0}")]
    Retrieval(String),

    /// A single file could not be fetched or written.
    #[error("Download failed: {0}")]
    Transfer(String),
}

pub type Result<T, E = DownloadError> = std::result::Result<T, E>;

pub(crate) const MANIFEST_URL_REQUIRED: &str = "JSON file URL is required";
pub(crate) const BASE_URL_REQUIRED: &str = "Base URL is required";
pub(crate) const FILE_UID_REQUIRED: &str = "File UID is required";
