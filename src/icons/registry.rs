//! Registry trait for fetching icon package metadata

#[cfg(test)]
use mockall::automock;

use crate::icons::error::RegistryError;
use crate::icons::types::VersionInfo;

/// Trait for fetching the published versions of an icon package
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches every published version of a package
    ///
    /// # Arguments
    /// * `package_name` - The npm package name (e.g., "@mdi/svg")
    ///
    /// # Returns
    /// * `Ok(VersionInfo)` - Latest tag and versions ordered from newest to oldest
    /// * `Err(RegistryError)` - If the fetch fails or the response is malformed
    async fn fetch_version_info(&self, package_name: &str) -> Result<VersionInfo, RegistryError>;
}
