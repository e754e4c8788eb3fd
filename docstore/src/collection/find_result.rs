use std::time::Duration;

use crate::collection::Document;
use crate::common::{Atomic, ReadExecutor};
use crate::index::Index;

/// Diagnostics attached to a find: the index used, the candidates the planner
/// considered and the time the operation took.
#[derive(Clone, Debug, Default)]
pub struct OperationInfo {
    pub(crate) index_used: Option<Index>,
    pub(crate) potential: Vec<Index>,
    pub(crate) elapsed: Duration,
    pub(crate) scanned: usize,
}

impl OperationInfo {
    pub fn index_used(&self) -> Option<&Index> {
        self.index_used.as_ref()
    }

    pub fn potential(&self) -> &[Index] {
        &self.potential
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of documents the matcher evaluated.
    pub fn scanned(&self) -> usize {
        self.scanned
    }
}

/// Documents returned by a find plus its [OperationInfo].
///
/// With `decouple` on (the default) every handle holds a private copy. With it
/// off, the handles are the stored documents: writing through
/// [`FindResult::handles`] changes the collection's data without updating its
/// indexes.
#[derive(Debug, Default)]
pub struct FindResult {
    documents: Vec<Atomic<Document>>,
    info: OperationInfo,
}

impl FindResult {
    pub(crate) fn new(documents: Vec<Atomic<Document>>, info: OperationInfo) -> Self {
        FindResult { documents, info }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Snapshot copies of the result documents.
    pub fn documents(&self) -> Vec<Document> {
        self.documents.iter().map(|d| d.read_with(|doc| doc.clone())).collect()
    }

    /// Snapshot copy of the document at `position`.
    pub fn get(&self, position: usize) -> Option<Document> {
        self.documents.get(position).map(|d| d.read_with(|doc| doc.clone()))
    }

    pub fn handles(&self) -> &[Atomic<Document>] {
        &self.documents
    }

    pub fn ids(&self) -> Vec<String> {
        self.documents
            .iter()
            .filter_map(|d| d.read_with(|doc| doc.id().map(str::to_string)))
            .collect()
    }

    pub fn info(&self) -> &OperationInfo {
        &self.info
    }
}

impl IntoIterator for FindResult {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents().into_iter()
    }
}
