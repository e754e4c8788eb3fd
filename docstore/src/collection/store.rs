use indexmap::IndexMap;

use crate::collection::Document;
use crate::common::{atomic, Atomic};

/// Primary storage of a collection: `_id` to document, in insertion order.
///
/// Documents are held behind [Atomic] handles so that coupled finds can hand
/// the stored document out directly.
#[derive(Default)]
pub(crate) struct DocumentStore {
    docs: IndexMap<String, Atomic<Document>>,
}

impl DocumentStore {
    pub(crate) fn new() -> Self {
        DocumentStore::default()
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Atomic<Document>> {
        self.docs.get(id)
    }

    /// Stores `document` under `id`, replacing any previous document.
    pub(crate) fn insert(&mut self, id: &str, document: Document) -> Atomic<Document> {
        let handle = atomic(document);
        self.docs.insert(id.to_string(), handle.clone());
        handle
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Atomic<Document>> {
        self.docs.shift_remove(id)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.docs.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &Atomic<Document>)> {
        self.docs.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.docs.clear();
    }
}
