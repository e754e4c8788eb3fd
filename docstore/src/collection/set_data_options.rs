/// Validation toggles of `Collection::set_data`.
///
/// Both checks are on by default. Bulk loaders that guarantee well-formed
/// input switch them off:
///
/// ```rust,ignore
/// collection.set_data(docs, &SetDataOptions::new().ensure_keys(false).violation_check(false))?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetDataOptions {
    pub(crate) ensure_keys: bool,
    pub(crate) violation_check: bool,
}

impl Default for SetDataOptions {
    fn default() -> Self {
        SetDataOptions {
            ensure_keys: true,
            violation_check: true,
        }
    }
}

impl SetDataOptions {
    pub fn new() -> SetDataOptions {
        SetDataOptions::default()
    }

    /// When set, documents without an `_id` get a generated one. When cleared,
    /// the caller guarantees every document carries its `_id`.
    pub fn ensure_keys(mut self, ensure_keys: bool) -> SetDataOptions {
        self.ensure_keys = ensure_keys;
        self
    }

    /// When set, documents colliding on a unique index are rejected. When
    /// cleared, they are indexed as they are.
    pub fn violation_check(mut self, violation_check: bool) -> SetDataOptions {
        self.violation_check = violation_check;
        self
    }
}
