use crate::collection::Document;
use crate::index::Index;

/// Outcome of planning a filter against a collection's indexes.
///
/// `potential` lists every index whose key fields are all constrained by the
/// filter, in registration order. `used` is the one chosen to serve the query,
/// or `None` for a full scan.
#[derive(Clone, Debug, Default)]
pub struct FindPlan {
    pub(crate) potential: Vec<Index>,
    pub(crate) used: Option<Index>,
    pub(crate) probe: Option<Document>,
    pub(crate) by_id: Option<String>,
}

impl FindPlan {
    pub fn potential(&self) -> &[Index] {
        &self.potential
    }

    pub fn used(&self) -> Option<&Index> {
        self.used.as_ref()
    }

    /// The partial document looked up in the used index.
    pub fn probe(&self) -> Option<&Document> {
        self.probe.as_ref()
    }

    /// The `_id` the filter pins, when it pins exactly one string id.
    pub fn by_id(&self) -> Option<&str> {
        self.by_id.as_deref()
    }

    pub fn is_full_scan(&self) -> bool {
        self.used.is_none() && self.by_id.is_none()
    }
}
