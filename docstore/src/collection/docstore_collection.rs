use std::sync::Arc;

use super::operation::{
    CollectionState, EnsureIndexResult, IndexOperations, InsertResult, ReadOperations, RemoveResult,
    SetDataResult, UpdateResult, WriteOperations,
};
use crate::collection::{Document, FindOptions, FindPlan, FindResult, SetDataOptions};
use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor, DOC_ID};
use crate::docstore_config::DocStoreConfig;
use crate::errors::DocStoreResult;
use crate::filter::{EqualityMatcher, FilterMatcher};
use crate::index::{Index, IndexOptions, KeySpec};

/// A named set of documents with its secondary indexes.
///
/// Every document carries a string `_id`. Writes keep the document store and
/// every index in step: a document is either stored and present in every
/// index, or in neither. Reads are planned against the indexes and always
/// confirmed by the filter matcher.
///
/// `Collection` is a cheap handle; clones share the same data. Mutations take
/// the collection's write lock, finds take its read lock.
///
/// ```rust
/// use docstore::collection::{Collection, FindOptions};
/// use docstore::doc;
/// use docstore::index::unique_index;
///
/// let users = Collection::new("users");
/// users.ensure_index(&doc! { name: 1 }, &unique_index().name("uniqueName"));
///
/// assert_eq!(users.insert(doc! { name: "Bob" }).unwrap().inserted().len(), 1);
/// assert_eq!(users.insert(doc! { name: "Bob" }).unwrap().inserted().len(), 0);
///
/// let found = users.find(&doc! { name: "Bob" }, &FindOptions::default()).unwrap();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found.info().index_used().unwrap().name(), "uniqueName");
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    name: String,
    config: DocStoreConfig,
    state: Atomic<CollectionState>,
    read_operations: ReadOperations,
    write_operations: WriteOperations,
    index_operations: IndexOperations,
}

impl Collection {
    /// Creates a standalone collection with the default configuration.
    pub fn new(name: &str) -> Self {
        Collection::with_config(name, &DocStoreConfig::default())
    }

    pub fn with_config(name: &str, config: &DocStoreConfig) -> Self {
        Collection::with_matcher(name, config, Arc::new(EqualityMatcher))
    }

    /// Creates a collection evaluating filters with `matcher`.
    pub fn with_matcher(name: &str, config: &DocStoreConfig, matcher: Arc<dyn FilterMatcher>) -> Self {
        let read_operations = ReadOperations::new(name, config.clone(), matcher);
        let write_operations = WriteOperations::new(name, read_operations.clone());
        Collection {
            inner: Arc::new(CollectionInner {
                name: name.to_string(),
                config: config.clone(),
                state: atomic(CollectionState::new()),
                read_operations,
                write_operations,
                index_operations: IndexOperations::new(name),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &DocStoreConfig {
        &self.inner.config
    }

    /// Inserts one document, generating its `_id` when absent.
    ///
    /// A document rejected by a unique index, or carrying an `_id` that is
    /// not a string or already taken, is reported in the result's `errors`
    /// and leaves no trace in the store or in any index.
    pub fn insert(&self, document: Document) -> DocStoreResult<InsertResult> {
        self.insert_many(vec![document])
    }

    /// Inserts documents in order; each one succeeds or fails on its own.
    pub fn insert_many(&self, documents: Vec<Document>) -> DocStoreResult<InsertResult> {
        self.inner
            .state
            .write_with(|state| self.inner.write_operations.insert_many(state, documents))
    }

    /// Removes every document matching `filter`.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if an index is found out of sync with the store;
    /// the offending document is left in place.
    pub fn remove(&self, filter: &Document) -> DocStoreResult<RemoveResult> {
        self.inner
            .state
            .write_with(|state| self.inner.write_operations.remove(state, filter))
    }

    /// Removes `document` by its `_id`, or uses it as a filter when it has none.
    pub fn remove_document(&self, document: &Document) -> DocStoreResult<RemoveResult> {
        match document.id() {
            Some(id) => self.remove(&Document::new().with_entry(DOC_ID, id.into())),
            None => self.remove(document),
        }
    }

    /// Merges `changes` into every match. Embedded documents merge field by
    /// field, so `{ "address.city": .. }` keeps the other `address` fields.
    pub fn update(&self, filter: &Document, changes: &Document) -> DocStoreResult<UpdateResult> {
        self.inner
            .state
            .write_with(|state| self.inner.write_operations.update(state, filter, changes))
    }

    /// Finds the documents matching `filter`.
    ///
    /// The result carries the plan's index and the elapsed time in its
    /// [OperationInfo](crate::collection::OperationInfo).
    pub fn find(&self, filter: &Document, find_options: &FindOptions) -> DocStoreResult<FindResult> {
        self.inner
            .state
            .read_with(|state| self.inner.read_operations.find(state, filter, find_options))
    }

    pub fn find_one(&self, filter: &Document) -> DocStoreResult<Option<Document>> {
        let result = self.find(filter, &FindOptions::new())?;
        Ok(result.get(0))
    }

    pub fn find_by_id(&self, id: &str) -> Option<Document> {
        self.inner.state.read_with(|state| {
            state
                .store
                .get(id)
                .map(|handle| handle.read_with(|document| document.clone()))
        })
    }

    /// Number of stored documents.
    pub fn count(&self) -> usize {
        self.inner.state.read_with(|state| state.store.len())
    }

    /// Plans `filter` without running it.
    pub fn explain(&self, filter: &Document) -> DocStoreResult<FindPlan> {
        self.explain_with(filter, &FindOptions::new())
    }

    pub fn explain_with(&self, filter: &Document, find_options: &FindOptions) -> DocStoreResult<FindPlan> {
        self.inner
            .state
            .read_with(|state| self.inner.read_operations.explain(state, filter, find_options))
    }

    /// Replaces every document with `documents` and rebuilds the indexes.
    pub fn set_data(&self, documents: Vec<Document>, options: &SetDataOptions) -> DocStoreResult<SetDataResult> {
        self.inner
            .state
            .write_with(|state| self.inner.write_operations.set_data(state, documents, options))
    }

    /// Removes every document. Indexes stay registered, empty.
    pub fn truncate(&self) {
        self.inner
            .state
            .write_with(|state| self.inner.write_operations.truncate(state))
    }

    /// Declares an index from a key document such as `{ orgId: 1, arr: { val: -1 } }`.
    ///
    /// The key document orders its fields by key, see [KeySpec::from_document];
    /// use [Collection::ensure_index_spec] when the field order matters.
    pub fn ensure_index(&self, keys: &Document, options: &IndexOptions) -> EnsureIndexResult {
        self.inner
            .state
            .write_with(|state| self.inner.index_operations.ensure_index(state, keys, options))
    }

    pub fn ensure_index_spec(&self, spec: KeySpec) -> EnsureIndexResult {
        self.inner
            .state
            .write_with(|state| self.inner.index_operations.ensure_index_spec(state, spec))
    }

    pub fn index(&self, name: &str) -> Option<Index> {
        self.inner.state.read_with(|state| state.registry.get(name))
    }

    /// Registered indexes in registration order.
    pub fn indexes(&self) -> Vec<Index> {
        self.inner
            .state
            .read_with(|state| state.registry.iter().cloned().collect())
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.inner.state.read_with(|state| state.registry.contains(name))
    }

    pub fn drop_index(&self, name: &str) -> DocStoreResult<()> {
        self.inner
            .state
            .write_with(|state| self.inner.index_operations.drop_index(state, name))
    }

    pub fn drop_all_indexes(&self) {
        self.inner
            .state
            .write_with(|state| self.inner.index_operations.drop_all_indexes(state))
    }

    /// Recomputes an index from the documents as they are now, e.g. after
    /// documents returned by a coupled find were changed in place.
    pub fn rebuild_index(&self, name: &str) -> DocStoreResult<()> {
        self.inner
            .state
            .write_with(|state| self.inner.index_operations.rebuild_index(state, name))
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.inner.name)
            .field("count", &self.count())
            .finish()
    }
}
