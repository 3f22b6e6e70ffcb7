//! On-disk snapshots, one file per (variant, version)
//!
//! Layout under the storage root:
//!
//! ```text
//! {root}/regular/7.0.96/snapshot.json
//! {root}/regular/latest
//! {root}/light/0.2.63/snapshot.json
//! ```

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::icons::error::StoreError;
use crate::icons::types::IconSetSnapshot;
use crate::icons::variant::Variant;

const SNAPSHOT_FILE: &str = "snapshot.json";
const LATEST_FILE: &str = "latest";

pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the snapshot path for a key, or an error when the version
    /// would escape its directory
    pub fn snapshot_path(&self, variant: Variant, version: &str) -> Result<PathBuf, StoreError> {
        validate_key(version)?;
        Ok(self
            .root
            .join(variant.as_str())
            .join(version)
            .join(SNAPSHOT_FILE))
    }

    fn latest_path(&self, variant: Variant) -> PathBuf {
        self.root.join(variant.as_str()).join(LATEST_FILE)
    }

    /// Read a snapshot. Missing, unreadable or unparseable files are a miss.
    pub async fn read(&self, variant: Variant, version: &str) -> Option<IconSetSnapshot> {
        let path = self
            .snapshot_path(variant, version)
            .inspect_err(|e| debug!("Snapshot lookup skipped: {}", e))
            .ok()?;

        let bytes = tokio::fs::read(&path)
            .await
            .inspect_err(|e| debug!("No local snapshot at {:?}: {}", path, e))
            .ok()?;

        serde_json::from_slice(&bytes)
            .inspect_err(|e| debug!("Ignoring unparseable snapshot {:?}: {}", path, e))
            .ok()
    }

    /// Persist a snapshot atomically, replacing any previous file only once
    /// the new one is completely written
    pub async fn write(
        &self,
        variant: Variant,
        version: &str,
        snapshot: &IconSetSnapshot,
    ) -> Result<(), StoreError> {
        let path = self.snapshot_path(variant, version)?;
        let bytes = serde_json::to_vec(snapshot)?;
        write_atomic(path.clone(), bytes).await?;
        info!("Saved {} icons to {:?}", snapshot.meta.len(), path);
        Ok(())
    }

    /// Last remote latest version seen for a variant
    pub async fn read_latest(&self, variant: Variant) -> Option<String> {
        let content = tokio::fs::read_to_string(self.latest_path(variant))
            .await
            .ok()?;
        let version = content.trim();
        (!version.is_empty() && validate_key(version).is_ok()).then(|| version.to_string())
    }

    pub async fn write_latest(&self, variant: Variant, version: &str) -> Result<(), StoreError> {
        validate_key(version)?;
        write_atomic(self.latest_path(variant), version.as_bytes().to_vec()).await
    }
}

fn validate_key(version: &str) -> Result<(), StoreError> {
    let invalid = version.is_empty()
        || version == "."
        || version == ".."
        || version.contains(['/', '\\'])
        || version.contains("..");
    if invalid {
        return Err(StoreError::InvalidKey(version.to_string()));
    }
    Ok(())
}

/// Write to a temp file next to `path`, then rename it into place
async fn write_atomic(path: PathBuf, bytes: Vec<u8>) -> Result<(), StoreError> {
    tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
        let parent = path
            .parent()
            .ok_or_else(|| StoreError::InvalidKey(path.display().to_string()))?;
        std::fs::create_dir_all(parent)?;

        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
}
