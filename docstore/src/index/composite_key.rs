use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt::Display;

use crate::common::{compare, CompareOptions, SortOrder, Value};

const KEY_ORDER: CompareOptions = CompareOptions { handle_missing: true };

/// One realized field value of a composite key, with the direction of its field.
#[derive(Clone, Debug)]
pub struct KeyPart {
    value: Value,
    order: SortOrder,
}

impl KeyPart {
    pub fn new(value: Value, order: SortOrder) -> Self {
        KeyPart { value, order }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }
}

/// Ordered tuple of realized field values for one key spec.
///
/// Keys order part by part, each part in its field's direction, using the
/// collation-aware comparator with missing values first. Two keys are equal iff
/// every part compares equal.
#[derive(Clone, Debug, Default)]
pub struct CompositeKey {
    parts: SmallVec<[KeyPart; 2]>,
}

impl CompositeKey {
    pub fn new(parts: impl IntoIterator<Item = KeyPart>) -> Self {
        CompositeKey {
            parts: parts.into_iter().collect(),
        }
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.parts.iter().map(|p| &p.value)
    }

    /// True when every part is missing.
    pub fn is_all_missing(&self) -> bool {
        self.parts.iter().all(|p| p.value.is_null())
    }

    /// Checks the part at `position` against a probe value.
    pub(crate) fn part_matches(&self, position: usize, value: &Value) -> bool {
        match self.parts.get(position) {
            Some(part) => compare(&part.value, value, SortOrder::Ascending, &KEY_ORDER) == Ordering::Equal,
            None => false,
        }
    }
}

impl PartialEq for CompositeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CompositeKey {}

impl PartialOrd for CompositeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompositeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.parts.iter().zip(other.parts.iter()) {
            let ordering = compare(&a.value, &b.value, a.order, &KEY_ORDER);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        self.parts.len().cmp(&other.parts.len())
    }
}

impl Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", part.value)?;
        }
        write!(f, ")")
    }
}
