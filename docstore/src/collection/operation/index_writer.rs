use crate::collection::Document;
use crate::errors::DocStoreResult;
use crate::index::{CompositeKey, Index, IndexRegistry};

/// Keys one document is about to occupy in every index of a collection.
///
/// Produced by [DocumentIndexWriter::stage]; nothing is written until
/// [StagedWrite::commit].
#[must_use]
pub(crate) struct StagedWrite {
    id: String,
    entries: Vec<(Index, Vec<CompositeKey>)>,
}

impl StagedWrite {
    pub(crate) fn commit(self) {
        for (index, keys) in self.entries {
            index.commit(&self.id, keys);
        }
    }
}

/// Keeps the indexes of one collection in step with its document store.
///
/// Writes are staged: every index is checked before any index is touched, so
/// a rejected document leaves no entry behind.
pub(crate) struct DocumentIndexWriter<'a> {
    registry: &'a IndexRegistry,
}

impl<'a> DocumentIndexWriter<'a> {
    pub(crate) fn new(registry: &'a IndexRegistry) -> Self {
        DocumentIndexWriter { registry }
    }

    /// Realizes the keys of `document` for every index, validating uniqueness
    /// when `check` is set. The first violation is returned as-is.
    pub(crate) fn stage(&self, id: &str, document: &Document, check: bool) -> DocStoreResult<StagedWrite> {
        let mut entries = Vec::with_capacity(self.registry.len());
        for index in self.registry.iter() {
            let keys = index.keys_for(document);
            if check {
                index.validate(id, &keys)?;
            }
            entries.push((index.clone(), keys));
        }

        Ok(StagedWrite {
            id: id.to_string(),
            entries,
        })
    }

    /// Removes `id` from every index. All indexes are verified first; an index
    /// out of sync with the store aborts before anything is removed.
    pub(crate) fn remove(&self, id: &str) -> DocStoreResult<()> {
        for index in self.registry.iter() {
            index.verify(id)?;
        }
        for index in self.registry.iter() {
            index.remove(id)?;
        }
        Ok(())
    }
}
