//! The store handle owning named collections.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::collection::Collection;
use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::docstore_builder::DocStoreBuilder;
use crate::docstore_config::DocStoreConfig;
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};

/// An in-memory document store: a set of named [Collection]s sharing one
/// [DocStoreConfig].
///
/// Each collection owns its documents and indexes; nothing is shared between
/// collections. `DocStore` is a cheap handle, clones see the same collections.
///
/// ```rust
/// use docstore::docstore::DocStore;
/// use docstore::doc;
///
/// let store = DocStore::builder().open().unwrap();
/// let users = store.collection("users");
/// users.insert(doc! { name: "Bob" }).unwrap();
/// assert_eq!(store.collection("users").count(), 1);
/// assert_eq!(store.collection_names(), vec!["users"]);
/// ```
#[derive(Clone)]
pub struct DocStore {
    inner: Arc<DocStoreInner>,
}

struct DocStoreInner {
    config: DocStoreConfig,
    collections: Atomic<IndexMap<String, Collection>>,
}

impl Default for DocStore {
    fn default() -> Self {
        DocStore::new(DocStoreConfig::default())
    }
}

impl DocStore {
    pub(crate) fn new(config: DocStoreConfig) -> Self {
        DocStore {
            inner: Arc::new(DocStoreInner {
                config,
                collections: atomic(IndexMap::new()),
            }),
        }
    }

    pub fn builder() -> DocStoreBuilder {
        DocStoreBuilder::new()
    }

    pub fn config(&self) -> &DocStoreConfig {
        &self.inner.config
    }

    /// Returns the collection called `name`, creating it on first use.
    pub fn collection(&self, name: &str) -> Collection {
        if let Some(collection) = self.inner.collections.read_with(|c| c.get(name).cloned()) {
            return collection;
        }

        self.inner.collections.write_with(|collections| {
            collections
                .entry(name.to_string())
                .or_insert_with(|| {
                    log::debug!("Creating collection '{}'", name);
                    Collection::with_config(name, &self.inner.config)
                })
                .clone()
        })
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner.collections.read_with(|c| c.contains_key(name))
    }

    /// Collection names in creation order.
    pub fn collection_names(&self) -> Vec<String> {
        self.inner.collections.read_with(|c| c.keys().cloned().collect())
    }

    /// Forgets the collection and empties it. Handles still held elsewhere see
    /// an empty collection.
    pub fn drop_collection(&self, name: &str) -> DocStoreResult<()> {
        match self.inner.collections.write_with(|c| c.shift_remove(name)) {
            Some(collection) => {
                collection.truncate();
                collection.drop_all_indexes();
                log::debug!("Dropped collection '{}'", name);
                Ok(())
            }
            None => {
                log::error!("No collection named '{}'", name);
                Err(DocStoreError::new(
                    &format!("No collection named '{}'", name),
                    ErrorKind::CollectionNotFound,
                ))
            }
        }
    }
}
