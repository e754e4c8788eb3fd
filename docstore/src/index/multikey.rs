use smallvec::{smallvec, SmallVec};

use crate::collection::Document;
use crate::common::{SortOrder, Value};
use crate::index::{CompositeKey, KeyPart, KeySpec};

type FieldValues = SmallVec<[Value; 1]>;

impl KeySpec {
    /// Realizes the composite keys `document` produces for this spec.
    ///
    /// Each field path is walked through the document; an array met at any
    /// segment branches once per element and the rest of the path continues
    /// under each element. A numeric segment indexes into an array instead of
    /// branching. A field with nothing at its path contributes one missing
    /// placeholder. The result is the cross product over all fields, generated
    /// lazily, each distinct key once.
    ///
    /// ```rust,ignore
    /// let spec = KeySpec::builder().asc("orgId").asc("arr.val").build()?;
    /// let doc = doc! { orgId: "3", arr: [{ val: 1 }, { val: 5 }] };
    /// assert_eq!(spec.realize(&doc).count(), 2);
    /// ```
    pub fn realize(&self, document: &Document) -> CompositeKeys {
        let per_field = self
            .fields()
            .iter()
            .map(|field| (resolve_path(document, field.segments()), field.order()))
            .collect();
        CompositeKeys::new(per_field)
    }
}

/// All distinct values at `segments` in `document`, or a single missing placeholder.
pub(crate) fn resolve_path(document: &Document, segments: &[String]) -> FieldValues {
    let mut values = FieldValues::new();
    if let Some((first, rest)) = segments.split_first() {
        if let Some(value) = document.field(first) {
            walk(value, rest, &mut values);
        }
    }

    if values.is_empty() {
        smallvec![Value::Null]
    } else {
        values
    }
}

fn walk(value: &Value, segments: &[String], out: &mut FieldValues) {
    match (value, segments.split_first()) {
        (Value::Null, _) => {}
        (Value::Array(items), None) => {
            for item in items {
                if !item.is_null() {
                    push_distinct(out, item.clone());
                }
            }
        }
        (value, None) => push_distinct(out, value.clone()),
        (Value::Document(doc), Some((segment, rest))) => {
            if let Some(next) = doc.field(segment) {
                walk(next, rest, out);
            }
        }
        (Value::Array(items), Some((segment, rest))) => match segment.parse::<usize>() {
            Ok(position) => {
                if let Some(item) = items.get(position) {
                    walk(item, rest, out);
                }
            }
            Err(_) => {
                for item in items {
                    walk(item, segments, out);
                }
            }
        },
        _ => {}
    }
}

fn push_distinct(out: &mut FieldValues, value: Value) {
    if !out.contains(&value) {
        out.push(value);
    }
}

/// Lazy cross product of per-field values, first field varying slowest.
pub struct CompositeKeys {
    fields: Vec<(FieldValues, SortOrder)>,
    cursor: SmallVec<[usize; 4]>,
    exhausted: bool,
}

impl CompositeKeys {
    fn new(fields: Vec<(FieldValues, SortOrder)>) -> Self {
        let exhausted = fields.is_empty() || fields.iter().any(|(values, _)| values.is_empty());
        CompositeKeys {
            cursor: smallvec![0; fields.len()],
            fields,
            exhausted,
        }
    }

    /// Upper bound of keys still to come.
    pub fn total(&self) -> usize {
        if self.fields.is_empty() {
            return 0;
        }
        self.fields.iter().map(|(values, _)| values.len()).product()
    }

    fn advance(&mut self) {
        for position in (0..self.fields.len()).rev() {
            self.cursor[position] += 1;
            if self.cursor[position] < self.fields[position].0.len() {
                return;
            }
            self.cursor[position] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for CompositeKeys {
    type Item = CompositeKey;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let key = CompositeKey::new(
            self.fields
                .iter()
                .zip(self.cursor.iter())
                .map(|((values, order), index)| KeyPart::new(values[*index].clone(), *order)),
        );
        self.advance();
        Some(key)
    }
}
