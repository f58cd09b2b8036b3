//! Batch download of the files listed in a host's JSON manifest.
//!
//! [`DownloadManager`] fetches the manifest through [`ManifestFetcher`] and
//! hands each entry to [`Downloader`], reporting progress to a
//! [`ProgressSink`].

pub mod downloader;
pub mod error;
pub mod logging;
pub mod manager;
pub mod manifest;
pub mod models;
pub mod progress;

pub use downloader::Downloader;
pub use error::{DownloadError, Result};
pub use manager::{DownloadManager, TOTAL_KEY};
pub use manifest::ManifestFetcher;
pub use models::FileDescriptor;
pub use progress::{ProgressManager, ProgressSink, ProgressUnit};

use anyhow::Context;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client shared by the manifest fetcher and the downloader.
pub fn build_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}
