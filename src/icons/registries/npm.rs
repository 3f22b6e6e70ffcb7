//! npm registry API implementation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::DEFAULT_REGISTRY_URL;
use crate::icons::error::RegistryError;
use crate::icons::http::build_client;
use crate::icons::registry::Registry;
use crate::icons::types::{VersionEntry, VersionInfo};

/// Response from npm registry API
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    versions: HashMap<String, NpmVersion>,
    /// Publish timestamps by version, plus `created` and `modified`
    #[serde(default)]
    time: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct NpmVersion {
    dist: NpmDist,
}

#[derive(Debug, Deserialize)]
struct NpmDist {
    tarball: String,
}

/// Registry implementation for npm registry API
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }

    fn into_version_info(
        package_name: &str,
        response: NpmPackageResponse,
    ) -> Result<VersionInfo, RegistryError> {
        let NpmPackageResponse {
            mut dist_tags,
            versions,
            time,
        } = response;

        let latest = dist_tags.remove("latest").ok_or_else(|| {
            RegistryError::InvalidResponse(format!("{package_name}: missing dist-tags.latest"))
        })?;

        let mut entries: Vec<(Version, VersionEntry)> = versions
            .into_iter()
            .filter_map(|(version, info)| {
                let Ok(parsed) = Version::parse(&version) else {
                    warn!("Skipping unparseable version {} of {}", version, package_name);
                    return None;
                };
                let published_at = time
                    .get(&version)
                    .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                    .map(|t| t.with_timezone(&Utc));
                Some((
                    parsed,
                    VersionEntry {
                        version,
                        published_at,
                        download_url: info.dist.tarball,
                    },
                ))
            })
            .collect();

        // Newest first
        entries.sort_by(|(a, _), (b, _)| b.cmp(a));

        let versions: Vec<VersionEntry> = entries.into_iter().map(|(_, entry)| entry).collect();

        if !versions.iter().any(|entry| entry.version == latest) {
            return Err(RegistryError::InvalidResponse(format!(
                "{package_name}: latest version {latest} is not in the version list"
            )));
        }

        Ok(VersionInfo { latest, versions })
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    async fn fetch_version_info(&self, package_name: &str) -> Result<VersionInfo, RegistryError> {
        let encoded_name = Self::encode_package_name(package_name);
        let url = format!("{}/{}", self.base_url, encoded_name);
        debug!("Fetching package metadata from {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !status.is_success() {
            warn!("npm registry returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let package_info: NpmPackageResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse npm registry response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        Self::into_version_info(package_name, package_info)
    }
}
