//! Per-variant icon cache with coalesced loading

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, info};

use crate::icons::error::IconSetError;
use crate::icons::fetcher::TarballFetcher;
use crate::icons::icon::{Icon, IconCollection};
use crate::icons::registry::Registry;
use crate::icons::resolver::VersionResolver;
use crate::icons::store::SnapshotStore;
use crate::icons::types::VersionInfo;
use crate::icons::variant::Variant;

type LoadResult = Result<Arc<IconCollection>, IconSetError>;
type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Icons of one variant, loaded lazily per version.
///
/// Lookup order for a version: memory, then the snapshot store, then the
/// registry and tarball. Loaded versions are kept for the lifetime of the set.
/// Concurrent requests for a version that is still loading wait on the same
/// load and receive the same result.
#[derive(Clone)]
pub struct IconSet {
    inner: Arc<Inner>,
}

struct Inner {
    variant: Variant,
    resolver: VersionResolver,
    fetcher: TarballFetcher,
    store: Arc<SnapshotStore>,
    loaded: Mutex<HashMap<String, Arc<IconCollection>>>,
    pending: Mutex<HashMap<String, PendingLoad>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl IconSet {
    pub fn new(variant: Variant, registry: Arc<dyn Registry>, store: Arc<SnapshotStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                variant,
                resolver: VersionResolver::new(registry, variant.package_name()),
                fetcher: TarballFetcher::new(store.clone()),
                store,
                loaded: Mutex::new(HashMap::new()),
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// All icons of `version`, in `meta.json` order
    pub async fn icon_list(&self, version: &str) -> LoadResult {
        if let Some(collection) = self.inner.cached(version) {
            return Ok(collection);
        }

        let load = {
            let mut pending = lock(&self.inner.pending);
            // A load may have completed between the first check and taking the lock
            if let Some(collection) = self.inner.cached(version) {
                return Ok(collection);
            }
            pending
                .entry(version.to_string())
                .or_insert_with(|| {
                    debug!("Starting load of {} {}", self.inner.variant, version);
                    let inner = self.inner.clone();
                    let version = version.to_string();
                    async move { inner.load_and_cache(version).await }
                        .boxed()
                        .shared()
                })
                .clone()
        };

        load.await
    }

    /// Exact, case-sensitive lookup. `Ok(None)` means the version loaded
    /// fine but has no icon with that name.
    pub async fn get_icon(&self, version: &str, name: &str) -> Result<Option<Icon>, IconSetError> {
        let collection = self.icon_list(version).await?;
        Ok(collection.get(name).cloned())
    }

    pub async fn available_versions(&self) -> Result<VersionInfo, IconSetError> {
        Ok(self.inner.resolver.available_versions().await?.clone())
    }

    /// Latest version if the registry has already been queried
    pub fn known_latest(&self) -> Option<String> {
        self.inner
            .resolver
            .resolved()
            .map(|info| info.latest.clone())
    }

    /// Whether `version` is already held in memory
    pub fn is_loaded(&self, version: &str) -> bool {
        self.inner.cached(version).is_some()
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.inner.store
    }
}

impl Inner {
    fn cached(&self, version: &str) -> Option<Arc<IconCollection>> {
        lock(&self.loaded).get(version).cloned()
    }

    /// Runs once per in-flight key. The cache entry is published before the
    /// pending entry is removed, so later callers always find one of them.
    async fn load_and_cache(self: Arc<Self>, version: String) -> LoadResult {
        let result = self.load(&version).await.map(Arc::new);

        if let Ok(collection) = &result {
            lock(&self.loaded).insert(version.clone(), collection.clone());
        }
        lock(&self.pending).remove(&version);

        result
    }

    async fn load(&self, version: &str) -> Result<IconCollection, IconSetError> {
        if let Some(snapshot) = self.store.read(self.variant, version).await {
            debug!("Loaded {} {} from local snapshot", self.variant, version);
            return Ok(IconCollection::from_snapshot(snapshot));
        }

        let versions = self.resolver.available_versions().await?;
        let entry = versions
            .find(version)
            .ok_or_else(|| IconSetError::VersionNotFound(version.to_string()))?;

        let snapshot = self
            .fetcher
            .fetch_and_persist(self.variant, &entry.download_url, version)
            .await?;

        let collection = IconCollection::from_snapshot(snapshot);
        info!(
            "Loaded {} {} ({} icons)",
            self.variant,
            version,
            collection.len()
        );
        Ok(collection)
    }
}
