use std::cmp::Ordering;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use once_cell::sync::Lazy;

use crate::common::{SortOrder, Value};

static COLLATOR: Lazy<Option<CollatorBorrowed<'static>>> = Lazy::new(|| {
    match Collator::try_new(CollatorPreferences::default(), CollatorOptions::default()) {
        Ok(collator) => Some(collator),
        Err(err) => {
            log::warn!("Failed to create collator, strings fall back to code point order: {}", err);
            None
        }
    }
});

/// Options shared by [sort_asc] and [sort_desc].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// When set, a missing value sorts before a present one in ascending order.
    /// When cleared, a missing value is equal to anything it is compared with.
    pub handle_missing: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            handle_missing: true,
        }
    }
}

/// Ascending order of two values.
///
/// Two strings are ordered by the root-locale collator, with code point order
/// breaking collation ties. Any other pair uses native ordering: numbers
/// numerically, booleans `false < true`, and values of different kinds by kind.
pub fn sort_asc(a: &Value, b: &Value, options: &CompareOptions) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => collate(x, y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) | (_, Value::Null) => {
            if options.handle_missing {
                a.kind_rank().cmp(&b.kind_rank())
            } else {
                Ordering::Equal
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ordering = sort_asc(l, r, options);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => a.cmp(b),
    }
}

/// Descending order of two values, always the reverse of [sort_asc].
pub fn sort_desc(a: &Value, b: &Value, options: &CompareOptions) -> Ordering {
    sort_asc(a, b, options).reverse()
}

/// Compares in the given direction.
#[inline]
pub fn compare(a: &Value, b: &Value, order: SortOrder, options: &CompareOptions) -> Ordering {
    match order {
        SortOrder::Ascending => sort_asc(a, b, options),
        SortOrder::Descending => sort_desc(a, b, options),
    }
}

fn collate(a: &str, b: &str) -> Ordering {
    match COLLATOR.as_ref() {
        Some(collator) => collator.compare(a, b).then_with(|| a.cmp(b)),
        None => a.cmp(b),
    }
}
