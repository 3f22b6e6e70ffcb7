//! Entry point for every icon query
//!
//! Picks the active variant from the current configuration on each call and
//! forwards to that variant's [`IconSet`].

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::config::LspConfig;
use crate::icons::error::IconSetError;
use crate::icons::icon::{Icon, IconCollection};
use crate::icons::icon_set::IconSet;
use crate::icons::registry::Registry;
use crate::icons::search::{SearchHit, search};
use crate::icons::store::SnapshotStore;
use crate::icons::types::VersionInfo;
use crate::icons::variant::Variant;

pub struct IconManager {
    config: RwLock<LspConfig>,
    regular: IconSet,
    light: IconSet,
}

impl IconManager {
    pub fn new(config: LspConfig, registry: Arc<dyn Registry>, store: Arc<SnapshotStore>) -> Self {
        Self {
            config: RwLock::new(config),
            regular: IconSet::new(Variant::Regular, registry.clone(), store.clone()),
            light: IconSet::new(Variant::Light, registry, store),
        }
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> LspConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update_config(&self, config: LspConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    pub fn active_variant(&self) -> Variant {
        Variant::from_light(self.config().icons.light)
    }

    pub fn icon_set(&self, variant: Variant) -> &IconSet {
        match variant {
            Variant::Regular => &self.regular,
            Variant::Light => &self.light,
        }
    }

    /// Icons of the configured variant and version
    pub async fn icon_list(&self) -> Result<Arc<IconCollection>, IconSetError> {
        let config = self.config();
        let variant = Variant::from_light(config.icons.light);
        self.icon_list_for(variant, config.icons.pinned_version())
            .await
    }

    /// Icons of `variant` at `pinned`, or at its latest version when `None`.
    ///
    /// A pinned version the registry does not know falls back to latest once.
    pub async fn icon_list_for(
        &self,
        variant: Variant,
        pinned: Option<&str>,
    ) -> Result<Arc<IconCollection>, IconSetError> {
        let set = self.icon_set(variant);

        let Some(version) = pinned else {
            let latest = self.latest_version(variant).await;
            return set.icon_list(&latest).await;
        };

        match set.icon_list(version).await {
            Err(IconSetError::VersionNotFound(missing)) => {
                let latest = self.latest_version(variant).await;
                if latest == missing {
                    return Err(IconSetError::VersionNotFound(missing));
                }
                warn!(
                    "{} version {} not found, falling back to {}",
                    variant, missing, latest
                );
                set.icon_list(&latest).await
            }
            other => other,
        }
    }

    pub async fn get_icon(&self, name: &str) -> Result<Option<Icon>, IconSetError> {
        let collection = self.icon_list().await?;
        Ok(collection.get(name).cloned())
    }

    pub async fn available_versions(&self) -> Result<VersionInfo, IconSetError> {
        self.icon_set(self.active_variant())
            .available_versions()
            .await
    }

    /// Rank the active icons against `query`
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Icon>, IconSetError> {
        let collection = self.icon_list().await?;
        Ok(search(collection.icons(), query)
            .into_iter()
            .take(limit)
            .map(|SearchHit { icon, .. }| icon.clone())
            .collect())
    }

    /// Version that "latest" currently stands for.
    ///
    /// Prefers what the registry already told us, then the last latest
    /// persisted on disk, then the variant's built-in fallback. Never waits
    /// on the registry; [`IconManager::refresh_latest`] updates what is known.
    pub async fn latest_version(&self, variant: Variant) -> String {
        let set = self.icon_set(variant);

        if let Some(latest) = set.known_latest() {
            return latest;
        }

        if let Some(latest) = set.store().read_latest(variant).await {
            return latest;
        }

        debug!(
            "No latest {} version known yet, using {}",
            variant,
            variant.fallback_version()
        );
        variant.fallback_version().to_string()
    }

    /// Ask the registry for the latest version of `variant` and remember it
    /// on disk
    pub async fn refresh_latest(&self, variant: Variant) -> Result<String, IconSetError> {
        let set = self.icon_set(variant);
        let latest = set.available_versions().await?.latest;

        let _ = set
            .store()
            .write_latest(variant, &latest)
            .await
            .inspect_err(|e| warn!("Failed to persist latest {} version: {}", variant, e));

        info!("Latest {} version is {}", variant, latest);
        Ok(latest)
    }
}
