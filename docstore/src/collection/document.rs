use im::OrdMap;
use itertools::Itertools;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt::{Debug, Display};

use crate::common::{Value, DOC_ID, FIELD_SEPARATOR};
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};

type FieldVec = SmallVec<[String; 8]>;

/// A schema-less record: an ordered mapping of field names to [Value]s.
///
/// Nested values are reached with dotted paths. `doc.get("location.city")`
/// walks into the embedded document under `location`; a numeric segment such as
/// `arr.1.val` addresses an array element, and a non numeric segment applied to
/// an array collects the value from every element.
///
/// The `_id` field identifies the document inside a collection. It is a string,
/// assigned by the caller or generated on insert.
///
/// The map is a persistent `im::OrdMap`, so cloning a document is cheap and
/// mutating a clone never affects the original. Keys iterate in sorted order.
#[derive(Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of top level fields.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with `key`, creating intermediate documents for a dotted key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldName` if the key or any of its segments is empty.
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("user.name", "Alice")?;
    /// assert_eq!(doc.get("user.name")?, Value::from("Alice"));
    /// ```
    pub fn put<'a, T: Into<Value>>(&mut self, key: impl Into<Cow<'a, str>>, value: T) -> DocStoreResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(DocStoreError::new(
                "Document does not support empty key",
                ErrorKind::InvalidFieldName,
            ));
        }

        let value = value.into();
        if key.contains(FIELD_SEPARATOR) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data = self.data.update(key.into_owned(), value);
            Ok(())
        }
    }

    /// Returns the value at `key`, or [Value::Null] when nothing is there.
    pub fn get(&self, key: &str) -> DocStoreResult<Value> {
        match self.data.get(key) {
            Some(value) => Ok(value.clone()),
            None if key.contains(FIELD_SEPARATOR) => {
                let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
                validate_segments(&splits)?;
                Ok(recursive_get(self.data.get(splits[0]), &splits[1..]))
            }
            None => Ok(Value::Null),
        }
    }

    /// Sets a top level entry verbatim; a dotted key stays a single key.
    pub(crate) fn with_entry(mut self, key: &str, value: Value) -> Document {
        self.data = self.data.update(key.to_string(), value);
        self
    }

    /// The raw top level value, without path resolution.
    pub(crate) fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns the `_id` if it is present and a string.
    pub fn id(&self) -> Option<&str> {
        self.data.get(DOC_ID).and_then(|v| v.as_string())
    }

    pub fn has_id(&self) -> bool {
        self.data.contains_key(DOC_ID)
    }

    /// Top level and embedded field paths, `_id` excluded.
    pub fn fields(&self) -> FieldVec {
        self.fields_with_prefix("")
    }

    /// Removes the value at `key`. Emptied embedded documents are removed as well.
    pub fn remove(&mut self, key: &str) -> DocStoreResult<()> {
        if self.data.contains_key(key) || !key.contains(FIELD_SEPARATOR) {
            self.data = self.data.without(key);
            return Ok(());
        }

        let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
        validate_segments(&splits)?;
        self.deep_remove(&splits);
        Ok(())
    }

    /// Checks for a top level key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Checks whether a possibly dotted path resolves to a non null value.
    pub fn contains_field(&self, field: &str) -> bool {
        self.get(field).map(|v| !v.is_null()).unwrap_or(false)
    }

    /// Merges `other` into this document. Embedded documents present on both
    /// sides are merged recursively, everything else is overwritten.
    pub fn merge(&mut self, other: &Document) -> DocStoreResult<()> {
        for (key, value) in other.data.iter() {
            match (self.data.get(key), value) {
                (Some(Value::Document(mine)), Value::Document(theirs)) => {
                    let mut merged = mine.clone();
                    merged.merge(theirs)?;
                    self.data = self.data.update(key.clone(), Value::Document(merged));
                }
                _ => self.put(key.as_str(), value.clone())?,
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, Value)> + '_ {
        self.data.iter().map(|(k, v)| (k.clone(), v.clone()))
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> DocStoreResult<()> {
        validate_segments(splits)?;
        let key = splits[0];
        if splits.len() == 1 {
            self.data = self.data.update(key.to_string(), value);
            return Ok(());
        }

        let remaining = &splits[1..];
        let updated = match self.data.get(key) {
            Some(Value::Document(obj)) => {
                let mut nested = obj.clone();
                nested.deep_put(remaining, value)?;
                Value::Document(nested)
            }
            Some(Value::Array(items)) => match array_index(remaining[0], items.len()) {
                Some(position) => {
                    let mut items = items.clone();
                    items[position] = if remaining.len() == 1 {
                        value
                    } else {
                        let mut nested = match &items[position] {
                            Value::Document(obj) => obj.clone(),
                            _ => Document::new(),
                        };
                        nested.deep_put(&remaining[1..], value)?;
                        Value::Document(nested)
                    };
                    Value::Array(items)
                }
                None => new_nested(remaining, value)?,
            },
            _ => new_nested(remaining, value)?,
        };
        self.data = self.data.update(key.to_string(), updated);
        Ok(())
    }

    fn deep_remove(&mut self, splits: &[&str]) {
        let key = splits[0];
        if splits.len() == 1 {
            self.data = self.data.without(key);
            return;
        }

        if let Some(Value::Document(obj)) = self.data.get(key) {
            let mut nested = obj.clone();
            nested.deep_remove(&splits[1..]);
            if nested.is_empty() {
                self.data = self.data.without(key);
            } else {
                self.data = self.data.update(key.to_string(), Value::Document(nested));
            }
        }
    }

    fn fields_with_prefix(&self, prefix: &str) -> FieldVec {
        let mut fields = FieldVec::new();
        for (key, value) in self.data.iter() {
            if prefix.is_empty() && key == DOC_ID {
                continue;
            }

            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
            };

            match value {
                Value::Document(nested) if !nested.is_empty() => {
                    fields.extend(nested.fields_with_prefix(&path));
                }
                _ => fields.push(path),
            }
        }
        fields
    }
}

fn new_nested(splits: &[&str], value: Value) -> DocStoreResult<Value> {
    let mut nested = Document::new();
    nested.deep_put(splits, value)?;
    Ok(Value::Document(nested))
}

fn validate_segments(splits: &[&str]) -> DocStoreResult<()> {
    if splits.is_empty() || splits.iter().any(|s| s.is_empty()) {
        log::error!("Invalid embedded key {:?}", splits.join(FIELD_SEPARATOR));
        return Err(DocStoreError::new(
            &format!("Invalid embedded key {}", splits.join(FIELD_SEPARATOR)),
            ErrorKind::InvalidFieldName,
        ));
    }
    Ok(())
}

/// Parses a path segment as an index into an array of `len` elements.
pub(crate) fn array_index(segment: &str, len: usize) -> Option<usize> {
    segment.parse::<usize>().ok().filter(|index| *index < len)
}

fn recursive_get(value: Option<&Value>, splits: &[&str]) -> Value {
    let value = match value {
        None => return Value::Null,
        Some(v) => v,
    };

    if splits.is_empty() {
        return value.clone();
    }

    match value {
        Value::Document(obj) => recursive_get(obj.data.get(splits[0]), &splits[1..]),
        Value::Array(items) => {
            if splits[0].parse::<usize>().is_ok() {
                match array_index(splits[0], items.len()) {
                    Some(position) => recursive_get(Some(&items[position]), &splits[1..]),
                    None => Value::Null,
                }
            } else {
                decompose(items, splits)
            }
        }
        _ => Value::Null,
    }
}

// collects the path from every array element, flattening nested arrays
fn decompose(items: &[Value], splits: &[&str]) -> Value {
    let mut collected = Vec::with_capacity(items.len());
    for item in items {
        match recursive_get(Some(item), splits) {
            Value::Null => {}
            Value::Array(values) => collected.extend(values),
            value => collected.push(value),
        }
    }
    Value::Array(collected.into_iter().unique().collect())
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{}\": {}", key, value)?;
        }
        write!(f, "}}")
    }
}

pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Keys may be bare identifiers or string literals; string literal keys may be
/// dotted paths. Negative numbers and other multi-token expressions go in
/// parentheses.
///
/// ```rust
/// use docstore::doc;
///
/// let user = doc! {
///     "_id": "4",
///     name: "Dean",
///     orgId: "3",
///     arr: [{ val: 1 }, { val: 5 }],
///     rank: (-1),
/// };
/// assert_eq!(user.id(), Some("4"));
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Converts one value of the [doc!] macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
