//! Configuration shared by a store and its collections.

use std::sync::Arc;
use std::time::Duration;

/// Settings of a [DocStore](crate::docstore::DocStore) and its collections.
///
/// The configuration is fixed once the store is opened; clones share it.
///
/// ```rust,ignore
/// use docstore::docstore::DocStore;
///
/// let store = DocStore::builder()
///     .decouple_results(false)
///     .slow_query_threshold(Duration::from_millis(50))
///     .open();
/// assert!(!store.config().decouple_results());
/// ```
#[derive(Clone)]
pub struct DocStoreConfig {
    inner: Arc<DocStoreConfigInner>,
}

#[derive(Debug, Clone)]
struct DocStoreConfigInner {
    decouple_results: bool,
    slow_query_threshold: Option<Duration>,
}

impl Default for DocStoreConfig {
    fn default() -> Self {
        DocStoreConfig::new(true, None)
    }
}

impl DocStoreConfig {
    pub(crate) fn new(decouple_results: bool, slow_query_threshold: Option<Duration>) -> Self {
        DocStoreConfig {
            inner: Arc::new(DocStoreConfigInner {
                decouple_results,
                slow_query_threshold,
            }),
        }
    }

    /// Whether finds return private copies unless their options say otherwise.
    pub fn decouple_results(&self) -> bool {
        self.inner.decouple_results
    }

    /// Finds taking longer than this are logged at warn level.
    pub fn slow_query_threshold(&self) -> Option<Duration> {
        self.inner.slow_query_threshold
    }
}

impl std::fmt::Debug for DocStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStoreConfig")
            .field("decouple_results", &self.inner.decouple_results)
            .field("slow_query_threshold", &self.inner.slow_query_threshold)
            .finish()
    }
}
