//! Registry and store test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mockito::{Mock, ServerGuard};
use serde_json::json;
use tempfile::TempDir;

use mdi_lsp::icons::error::RegistryError;
use mdi_lsp::icons::registry::Registry;
use mdi_lsp::icons::store::SnapshotStore;
use mdi_lsp::icons::types::{IconSetSnapshot, VersionEntry, VersionInfo};
use mdi_lsp::icons::variant::Variant;

/// In-memory registry for testing
pub struct MockRegistry {
    packages: HashMap<String, VersionInfo>,
    calls: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            packages: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Publish `versions` (newest first) of the variant's package; the
    /// first one is latest
    pub fn with_versions(mut self, variant: Variant, versions: Vec<&str>) -> Self {
        let info = VersionInfo {
            latest: versions.first().map(|v| v.to_string()).unwrap_or_default(),
            versions: versions
                .into_iter()
                .map(|version| VersionEntry {
                    version: version.to_string(),
                    published_at: None,
                    download_url: format!("http://127.0.0.1:9/{}-{}.tgz", variant, version),
                })
                .collect(),
        };
        self.packages
            .insert(variant.package_name().to_string(), info);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch_version_info(&self, package_name: &str) -> Result<VersionInfo, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.packages.get(package_name) {
            Some(info) => Ok(info.clone()),
            None => Err(RegistryError::NotFound(package_name.to_string())),
        }
    }
}

/// Create a test store with pre-populated snapshots
pub async fn create_test_store(
    snapshots: &[(Variant, IconSetSnapshot)],
) -> (TempDir, Arc<SnapshotStore>) {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path());

    for (variant, snapshot) in snapshots {
        store
            .write(*variant, &snapshot.version, snapshot)
            .await
            .unwrap();
    }

    (temp_dir, Arc::new(store))
}

/// npm registry document for the variant's package, with tarballs served by
/// `server` under `/tarballs/{variant}-{version}.tgz`
pub fn registry_body(server: &ServerGuard, variant: Variant, versions: &[&str]) -> String {
    let latest = versions.first().copied().unwrap_or_default();
    let mut version_map = serde_json::Map::new();
    let mut time_map = serde_json::Map::new();

    for version in versions {
        version_map.insert(
            version.to_string(),
            json!({ "dist": { "tarball": format!("{}{}", server.url(), tarball_path(variant, version)) } }),
        );
        time_map.insert(version.to_string(), json!("2024-01-15T10:00:00.000Z"));
    }
    time_map.insert("created".to_string(), json!("2016-01-01T00:00:00.000Z"));

    json!({
        "name": variant.package_name(),
        "dist-tags": { "latest": latest },
        "versions": version_map,
        "time": time_map,
    })
    .to_string()
}

pub fn tarball_path(variant: Variant, version: &str) -> String {
    format!("/tarballs/{}-{}.tgz", variant, version)
}

pub fn registry_path(variant: Variant) -> String {
    format!("/{}", variant.package_name().replace('/', "%2F"))
}

/// Registry document mock for the variant; call `create_async` on it
pub fn mock_registry_document(server: &mut ServerGuard, variant: Variant, versions: &[&str]) -> Mock {
    let body = registry_body(server, variant, versions);
    server
        .mock("GET", registry_path(variant).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
}

/// Tarball mock for (variant, version); call `create_async` on it
pub fn mock_tarball(server: &mut ServerGuard, variant: Variant, version: &str, bytes: Vec<u8>) -> Mock {
    server
        .mock("GET", tarball_path(variant, version).as_str())
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(bytes)
}
