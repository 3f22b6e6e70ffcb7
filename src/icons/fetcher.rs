//! Tarball download, extraction and persistence

use std::sync::Arc;

use futures::TryStreamExt;
use tracing::{info, warn};

use crate::icons::archive::extract_snapshot;
use crate::icons::error::FetchError;
use crate::icons::http::build_client;
use crate::icons::store::SnapshotStore;
use crate::icons::types::IconSetSnapshot;
use crate::icons::variant::Variant;

pub struct TarballFetcher {
    client: reqwest::Client,
    store: Arc<SnapshotStore>,
}

impl TarballFetcher {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self {
            client: build_client(),
            store,
        }
    }

    /// Download the tarball at `download_url`, extract it and persist the
    /// resulting snapshot under (variant, version).
    ///
    /// Nothing is written unless the whole archive was read and validated.
    pub async fn fetch_and_persist(
        &self,
        variant: Variant,
        download_url: &str,
        version: &str,
    ) -> Result<IconSetSnapshot, FetchError> {
        info!("Downloading {} {} from {}", variant, version, download_url);

        let response = self
            .client
            .get(download_url)
            .send()
            .await?
            .error_for_status()
            .inspect_err(|e| warn!("Tarball request failed: {}", e))?;

        let body = Box::pin(response.bytes_stream().map_err(std::io::Error::other)).into_async_read();

        let snapshot = extract_snapshot(body, version)
            .await
            .inspect_err(|e| warn!("Failed to extract {} {}: {}", variant, version, e))?;

        if snapshot.version != version {
            warn!(
                "Package declares version {} but was requested as {}",
                snapshot.version, version
            );
        }

        self.store.write(variant, version, &snapshot).await?;

        info!(
            "Fetched {} {} ({} icons)",
            variant,
            version,
            snapshot.meta.len()
        );
        Ok(snapshot)
    }
}
