use crate::errors::DocStoreError;

/// A document a batch write could not apply.
#[derive(Debug)]
pub struct WriteFailure {
    position: usize,
    id: Option<String>,
    error: DocStoreError,
}

impl WriteFailure {
    pub(crate) fn new(position: usize, id: Option<String>, error: DocStoreError) -> Self {
        WriteFailure { position, id, error }
    }

    /// Position of the document in the input batch.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn error(&self) -> &DocStoreError {
        &self.error
    }
}

/// Outcome of `insert` / `insert_many`.
///
/// `inserted` lists the ids that were stored, in input order. A document that
/// was rejected appears only in `errors`.
#[derive(Debug, Default)]
pub struct InsertResult {
    pub(crate) inserted: Vec<String>,
    pub(crate) errors: Vec<WriteFailure>,
}

impl InsertResult {
    pub fn inserted(&self) -> &[String] {
        &self.inserted
    }

    pub fn errors(&self) -> &[WriteFailure] {
        &self.errors
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Outcome of `remove` / `remove_document`.
#[derive(Debug, Default)]
pub struct RemoveResult {
    pub(crate) removed: Vec<String>,
}

impl RemoveResult {
    pub fn removed(&self) -> &[String] {
        &self.removed
    }
}

/// Outcome of `update`.
#[derive(Debug, Default)]
pub struct UpdateResult {
    pub(crate) updated: Vec<String>,
    pub(crate) errors: Vec<WriteFailure>,
}

impl UpdateResult {
    pub fn updated(&self) -> &[String] {
        &self.updated
    }

    pub fn errors(&self) -> &[WriteFailure] {
        &self.errors
    }
}

/// Outcome of `set_data`.
#[derive(Debug, Default)]
pub struct SetDataResult {
    pub(crate) loaded: Vec<String>,
    pub(crate) errors: Vec<WriteFailure>,
}

impl SetDataResult {
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    pub fn errors(&self) -> &[WriteFailure] {
        &self.errors
    }
}

/// `ok` and the name the index is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureIndexState {
    pub ok: bool,
    pub name: String,
}

/// Outcome of `ensure_index`: a failure is carried in `err`, never raised.
#[derive(Debug)]
pub struct EnsureIndexResult {
    pub err: Option<DocStoreError>,
    pub state: EnsureIndexState,
}

impl EnsureIndexResult {
    pub(crate) fn ok(name: &str) -> Self {
        EnsureIndexResult {
            err: None,
            state: EnsureIndexState {
                ok: true,
                name: name.to_string(),
            },
        }
    }

    pub(crate) fn failed(name: &str, err: DocStoreError) -> Self {
        EnsureIndexResult {
            err: Some(err),
            state: EnsureIndexState {
                ok: false,
                name: name.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.state.ok
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }
}
