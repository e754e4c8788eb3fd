use std::sync::Arc;

use super::{CollectionState, EnsureIndexResult};
use crate::collection::Document;
use crate::common::ReadExecutor;
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};
use crate::index::{Index, IndexOptions, KeySpec};

#[derive(Clone)]
pub(crate) struct IndexOperations {
    inner: Arc<IndexOperationsInner>,
}

impl IndexOperations {
    pub(crate) fn new(collection_name: &str) -> Self {
        IndexOperations {
            inner: Arc::new(IndexOperationsInner {
                collection_name: collection_name.to_string(),
            }),
        }
    }

    pub(crate) fn ensure_index(
        &self,
        state: &mut CollectionState,
        keys: &Document,
        options: &IndexOptions,
    ) -> EnsureIndexResult {
        match KeySpec::from_document(keys, options) {
            Ok(spec) => self.inner.ensure_index(state, spec),
            Err(error) => {
                log::debug!("Invalid index keys {}: {}", keys, error);
                EnsureIndexResult::failed(options.index_name().unwrap_or_default(), error)
            }
        }
    }

    pub(crate) fn ensure_index_spec(&self, state: &mut CollectionState, spec: KeySpec) -> EnsureIndexResult {
        self.inner.ensure_index(state, spec)
    }

    pub(crate) fn drop_index(&self, state: &mut CollectionState, name: &str) -> DocStoreResult<()> {
        self.inner.drop_index(state, name)
    }

    pub(crate) fn drop_all_indexes(&self, state: &mut CollectionState) {
        self.inner.drop_all_indexes(state)
    }

    pub(crate) fn rebuild_index(&self, state: &CollectionState, name: &str) -> DocStoreResult<()> {
        self.inner.rebuild_index(state, name)
    }
}

struct IndexOperationsInner {
    collection_name: String,
}

impl IndexOperationsInner {
    fn ensure_index(&self, state: &mut CollectionState, spec: KeySpec) -> EnsureIndexResult {
        let name = spec.name().to_string();
        if let Some(existing) = state.registry.get(&name) {
            if existing.key_spec().same_definition(&spec) {
                return EnsureIndexResult::ok(&name);
            }
            log::debug!(
                "Index '{}' of '{}' already exists as {}, requested {}",
                name,
                self.collection_name,
                existing.key_spec(),
                spec
            );
            let error = DocStoreError::new(
                &format!("Index '{}' already exists with a different definition", name),
                ErrorKind::IndexAlreadyExists,
            );
            return EnsureIndexResult::failed(&name, error);
        }

        let index = Index::new(spec);
        for (id, handle) in state.store.iter() {
            if let Err(cause) = handle.read_with(|document| index.insert(id, document)) {
                log::debug!("Building index '{}' of '{}' failed: {}", name, self.collection_name, cause);
                let error = DocStoreError::new_with_cause(
                    &format!("Failed to build index '{}'", name),
                    ErrorKind::IndexBuildFailed,
                    cause,
                );
                return EnsureIndexResult::failed(&name, error);
            }
        }

        log::debug!(
            "Created index '{}' on '{}' over {} documents",
            name,
            self.collection_name,
            index.size()
        );
        state.registry.ensure(index);
        EnsureIndexResult::ok(&name)
    }

    fn drop_index(&self, state: &mut CollectionState, name: &str) -> DocStoreResult<()> {
        match state.registry.deregister(name) {
            Some(index) => {
                index.clear();
                log::debug!("Dropped index '{}' of '{}'", name, self.collection_name);
                Ok(())
            }
            None => Err(index_not_found(&self.collection_name, name)),
        }
    }

    fn drop_all_indexes(&self, state: &mut CollectionState) {
        for index in state.registry.clear() {
            index.clear();
        }
        log::debug!("Dropped all indexes of '{}'", self.collection_name);
    }

    /// Recomputes the entries of an index from the stored documents, as they
    /// are now. Uniqueness is not re-validated.
    fn rebuild_index(&self, state: &CollectionState, name: &str) -> DocStoreResult<()> {
        let index = state
            .registry
            .get(name)
            .ok_or_else(|| index_not_found(&self.collection_name, name))?;

        index.clear();
        for (id, handle) in state.store.iter() {
            let keys = handle.read_with(|document| index.keys_for(document));
            index.commit(id, keys);
        }
        log::debug!("Rebuilt index '{}' of '{}'", name, self.collection_name);
        Ok(())
    }
}

fn index_not_found(collection_name: &str, name: &str) -> DocStoreError {
    log::debug!("No index '{}' on '{}'", name, collection_name);
    DocStoreError::new(
        &format!("No index named '{}' on '{}'", name, collection_name),
        ErrorKind::IndexNotFound,
    )
}
