/// Options of `Collection::find`.
///
/// ```rust,ignore
/// let live = FindOptions::new().decouple(false);
/// let scan = FindOptions::new().skip_index(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub(crate) decouple: Option<bool>,
    pub(crate) skip_index: bool,
}

impl FindOptions {
    pub fn new() -> FindOptions {
        FindOptions::default()
    }

    /// Return copies (`true`) or the stored documents themselves (`false`).
    /// Unset, the collection's configured default applies.
    pub fn decouple(mut self, decouple: bool) -> FindOptions {
        self.decouple = Some(decouple);
        self
    }

    /// Forces a full scan even when an index could serve the filter.
    pub fn skip_index(mut self, skip_index: bool) -> FindOptions {
        self.skip_index = skip_index;
        self
    }

    pub fn is_skip_index(&self) -> bool {
        self.skip_index
    }

    pub fn decouple_or(&self, default: bool) -> bool {
        self.decouple.unwrap_or(default)
    }
}

/// Finds without touching any index.
pub fn skip_index() -> FindOptions {
    FindOptions::new().skip_index(true)
}

/// Finds returning live stored documents.
pub fn coupled() -> FindOptions {
    FindOptions::new().decouple(false)
}
