use std::cmp::Ordering;

/// Direction of one key field inside an index.
///
/// Ascending corresponds to `1` and descending to `-1` in key documents such as
/// `{ "name": 1, "age": -1 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    /// Smallest to largest
    Ascending,
    /// Largest to smallest
    Descending,
}

impl SortOrder {
    /// Parses the numeric direction used by key documents.
    pub fn from_direction(direction: i64) -> Option<SortOrder> {
        match direction {
            1 => Some(SortOrder::Ascending),
            -1 => Some(SortOrder::Descending),
            _ => None,
        }
    }

    pub fn direction(&self) -> i64 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Applies this direction to an ascending ordering.
    #[inline]
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}
