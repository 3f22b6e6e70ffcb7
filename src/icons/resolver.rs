//! Memoized version lookup for one icon package

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::icons::error::RegistryError;
use crate::icons::registry::Registry;
use crate::icons::types::VersionInfo;

/// Resolves the published versions of a single package.
///
/// The first successful registry response is kept for the lifetime of the
/// resolver; concurrent first calls share one request. Failures are not
/// remembered, so a later call retries.
pub struct VersionResolver {
    registry: Arc<dyn Registry>,
    package_name: &'static str,
    resolved: OnceCell<VersionInfo>,
}

impl VersionResolver {
    pub fn new(registry: Arc<dyn Registry>, package_name: &'static str) -> Self {
        Self {
            registry,
            package_name,
            resolved: OnceCell::new(),
        }
    }

    pub async fn available_versions(&self) -> Result<&VersionInfo, RegistryError> {
        self.resolved
            .get_or_try_init(|| async {
                let info = self.registry.fetch_version_info(self.package_name).await?;
                info!(
                    "Resolved {} versions of {} (latest {})",
                    info.versions.len(),
                    self.package_name,
                    info.latest
                );
                Ok(info)
            })
            .await
    }

    /// Version info if it has already been resolved, without a network request
    pub fn resolved(&self) -> Option<&VersionInfo> {
        self.resolved.get()
    }
}
