use std::sync::Arc;

use super::{
    CollectionState, DocumentIndexWriter, InsertResult, ReadOperations, RemoveResult, SetDataResult,
    UpdateResult, WriteFailure,
};
use crate::collection::{Document, FindOptions, SetDataOptions};
use crate::common::{ReadExecutor, Value, WriteExecutor, DOC_ID};
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};

#[derive(Clone)]
pub(crate) struct WriteOperations {
    inner: Arc<WriteOperationsInner>,
}

impl WriteOperations {
    pub(crate) fn new(collection_name: &str, read_operations: ReadOperations) -> Self {
        WriteOperations {
            inner: Arc::new(WriteOperationsInner {
                collection_name: collection_name.to_string(),
                read_operations,
            }),
        }
    }

    /// Inserts documents one after the other. A document rejected for its id
    /// or by a unique index is reported and skipped; the rest go in.
    pub(crate) fn insert_many(
        &self,
        state: &mut CollectionState,
        documents: Vec<Document>,
    ) -> DocStoreResult<InsertResult> {
        self.inner.insert_many(state, documents)
    }

    pub(crate) fn remove(&self, state: &mut CollectionState, filter: &Document) -> DocStoreResult<RemoveResult> {
        self.inner.remove(state, filter)
    }

    pub(crate) fn update(
        &self,
        state: &mut CollectionState,
        filter: &Document,
        changes: &Document,
    ) -> DocStoreResult<UpdateResult> {
        self.inner.update(state, filter, changes)
    }

    pub(crate) fn set_data(
        &self,
        state: &mut CollectionState,
        documents: Vec<Document>,
        options: &SetDataOptions,
    ) -> DocStoreResult<SetDataResult> {
        self.inner.set_data(state, documents, options)
    }

    pub(crate) fn truncate(&self, state: &mut CollectionState) {
        self.inner.truncate(state)
    }
}

struct WriteOperationsInner {
    collection_name: String,
    read_operations: ReadOperations,
}

impl WriteOperationsInner {
    fn insert_many(&self, state: &mut CollectionState, documents: Vec<Document>) -> DocStoreResult<InsertResult> {
        let mut result = InsertResult::default();
        for (position, mut document) in documents.into_iter().enumerate() {
            let id = match assign_id(&mut document, true) {
                Ok(id) => id,
                Err(error) => {
                    log::debug!("Rejected document at {} of insert into '{}': {}", position, self.collection_name, error);
                    result.errors.push(WriteFailure::new(position, None, error));
                    continue;
                }
            };

            match self.stage_new(state, &id, &document, true) {
                Ok(()) => {
                    state.store.insert(&id, document);
                    result.inserted.push(id);
                }
                Err(error) if error.kind().is_recoverable() => {
                    log::debug!("Rejected document {} of insert into '{}': {}", id, self.collection_name, error);
                    result.errors.push(WriteFailure::new(position, Some(id), error));
                }
                Err(error) => return Err(error),
            }
        }
        Ok(result)
    }

    /// Rejects a taken id, then validates and commits the document's keys.
    fn stage_new(&self, state: &CollectionState, id: &str, document: &Document, check: bool) -> DocStoreResult<()> {
        if state.store.contains(id) {
            return Err(DocStoreError::new(
                &format!("Document with id {} already exists in '{}'", id, self.collection_name),
                ErrorKind::DuplicateKey,
            ));
        }

        DocumentIndexWriter::new(&state.registry)
            .stage(id, document, check)?
            .commit();
        Ok(())
    }

    fn remove(&self, state: &mut CollectionState, filter: &Document) -> DocStoreResult<RemoveResult> {
        let matches = self
            .read_operations
            .find_matches(state, filter, &FindOptions::new())?;

        let mut result = RemoveResult::default();
        for (id, _) in matches.documents {
            DocumentIndexWriter::new(&state.registry).remove(&id)?;
            state.store.remove(&id);
            result.removed.push(id);
        }

        log::debug!("Removed {} documents from '{}'", result.removed.len(), self.collection_name);
        Ok(result)
    }

    fn update(&self, state: &mut CollectionState, filter: &Document, changes: &Document) -> DocStoreResult<UpdateResult> {
        if changes.contains_key(DOC_ID) {
            log::error!("Attempt to change {} of documents in '{}'", DOC_ID, self.collection_name);
            return Err(DocStoreError::new(
                &format!("{} of a document cannot be changed", DOC_ID),
                ErrorKind::InvalidOperation,
            ));
        }

        Document::new().merge(changes)?;

        let matches = self
            .read_operations
            .find_matches(state, filter, &FindOptions::new())?;

        let mut result = UpdateResult::default();
        for (position, (id, handle)) in matches.documents.into_iter().enumerate() {
            let mut updated = handle.read_with(|document| document.clone());
            updated.merge(changes)?;

            let writer = DocumentIndexWriter::new(&state.registry);
            let staged = match writer.stage(&id, &updated, true) {
                Ok(staged) => staged,
                Err(error) if error.kind().is_recoverable() => {
                    log::debug!("Update of {} in '{}' rejected: {}", id, self.collection_name, error);
                    result.errors.push(WriteFailure::new(position, Some(id), error));
                    continue;
                }
                Err(error) => return Err(error),
            };

            writer.remove(&id)?;
            staged.commit();
            handle.write_with(|document| *document = updated);
            result.updated.push(id);
        }
        Ok(result)
    }

    fn set_data(
        &self,
        state: &mut CollectionState,
        documents: Vec<Document>,
        options: &SetDataOptions,
    ) -> DocStoreResult<SetDataResult> {
        self.truncate(state);

        let mut result = SetDataResult::default();
        for (position, mut document) in documents.into_iter().enumerate() {
            let outcome = assign_id(&mut document, options.ensure_keys)
                .and_then(|id| self.stage_new(state, &id, &document, options.violation_check).map(|_| id));

            match outcome {
                Ok(id) => {
                    state.store.insert(&id, document);
                    result.loaded.push(id);
                }
                Err(error) if !error.kind().is_recoverable() => return Err(error),
                Err(error) => {
                    log::debug!("Skipped document at {} while loading '{}': {}", position, self.collection_name, error);
                    let id = document.id().map(str::to_string);
                    result.errors.push(WriteFailure::new(position, id, error));
                }
            }
        }

        log::debug!(
            "Loaded {} documents into '{}', {} rejected",
            result.loaded.len(),
            self.collection_name,
            result.errors.len()
        );
        Ok(result)
    }

    fn truncate(&self, state: &mut CollectionState) {
        state.store.clear();
        for index in state.registry.iter() {
            index.clear();
        }
    }
}

/// Returns the string `_id` of `document`, generating one when it is absent
/// and `generate` is set.
fn assign_id(document: &mut Document, generate: bool) -> DocStoreResult<String> {
    match document.field(DOC_ID) {
        Some(Value::String(id)) => Ok(id.clone()),
        None | Some(Value::Null) if generate => {
            let id = uuid::Uuid::new_v4().to_string();
            document.put(DOC_ID, id.as_str())?;
            Ok(id)
        }
        None | Some(Value::Null) => Err(DocStoreError::new(
            &format!("Document has no {}", DOC_ID),
            ErrorKind::InvalidId,
        )),
        Some(other) => Err(DocStoreError::new(
            &format!("{} must be a string, found {}", DOC_ID, other.kind_name()),
            ErrorKind::InvalidId,
        )),
    }
}
