//! Retrieval and validation of the JSON manifest listing the files to fetch.

use crate::error::{DownloadError, MANIFEST_URL_REQUIRED, Result};
use crate::models::{FileDescriptor, ManifestEntry};
use anyhow::{Context, anyhow, bail};
use reqwest::Client;
use serde_json::Value;
use tracing::{error, info};

pub struct ManifestFetcher {
    client: Client,
}

impl ManifestFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches the manifest and maps every entry to a [`FileDescriptor`],
    /// keeping manifest order.
    ///
    /// Validation is all-or-nothing: a single malformed element rejects the
    /// whole manifest.
    pub async fn retrieve_file_list(&self, manifest_url: &str) -> Result<Vec<FileDescriptor>> {
        if manifest_url.is_empty() {
            error!("Download failed: JSON file URL is missing");
            return Err(DownloadError::Input(MANIFEST_URL_REQUIRED));
        }

        info!("Starting retrieval of file list from: {}", manifest_url);

        match self.fetch(manifest_url).await {
            Ok(files) => {
                info!("Found {} files in the list", files.len());
                Ok(files)
            }
            Err(e) => {
                let err = DownloadError::Retrieval(format!("{e:#}"));
                error!("{}", err);
                Err(err)
            }
        }
    }

    async fn fetch(&self, manifest_url: &str) -> anyhow::Result<Vec<FileDescriptor>> {
        let response = self.client.get(manifest_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            bail!(
                "HTTP error {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            );
        }

        let body: Value = response.json().await.context("Invalid JSON body")?;
        parse_manifest(body)
    }
}

pub(crate) fn parse_manifest(body: Value) -> anyhow::Result<Vec<FileDescriptor>> {
    let Value::Array(items) = body else {
        bail!("Invalid JSON format: expected an array");
    };

    let well_formed = items.iter().all(|item| {
        item.as_object()
            .is_some_and(|fields| fields.contains_key("uid") && fields.contains_key("name"))
    });
    if !well_formed {
        bail!("Invalid JSON format: items must have uid and name");
    }

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<ManifestEntry>(item)
                .map(FileDescriptor::from)
                .map_err(|e| anyhow!("Invalid JSON format: items must have uid and name ({e})"))
        })
        .collect()
}
