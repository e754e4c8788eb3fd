mod find_optimizer;
mod index_operations;
mod index_writer;
mod read_operations;
mod write_operations;
mod write_result;

pub(crate) use find_optimizer::*;
pub(crate) use index_operations::*;
pub(crate) use index_writer::*;
pub(crate) use read_operations::*;
pub(crate) use write_operations::*;
pub use write_result::*;

use crate::collection::store::DocumentStore;
use crate::index::IndexRegistry;

/// Everything a collection owns: its documents and its indexes.
#[derive(Default)]
pub(crate) struct CollectionState {
    pub(crate) store: DocumentStore,
    pub(crate) registry: IndexRegistry,
}

impl CollectionState {
    pub(crate) fn new() -> Self {
        CollectionState::default()
    }
}
