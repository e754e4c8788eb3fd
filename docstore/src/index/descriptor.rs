use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Display;
use std::sync::Arc;

use crate::collection::Document;
use crate::common::{SortOrder, Value, DIRECTION_SEPARATOR, FIELD_SEPARATOR, NAME_SEPARATOR};
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};
use crate::index::IndexOptions;

/// One key field of a [KeySpec]: a dotted path and its direction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyField {
    path: String,
    segments: SmallVec<[String; 4]>,
    order: SortOrder,
}

impl KeyField {
    fn new(path: &str, order: SortOrder) -> DocStoreResult<KeyField> {
        let segments: SmallVec<[String; 4]> = path.split(FIELD_SEPARATOR).map(str::to_string).collect();
        if path.is_empty() || segments.iter().any(|s| s.is_empty()) {
            log::error!("Invalid index field path '{}'", path);
            return Err(DocStoreError::new(
                &format!("Invalid index field path '{}'", path),
                ErrorKind::InvalidFieldName,
            ));
        }

        Ok(KeyField {
            path: path.to_string(),
            segments,
            order,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub(crate) fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Declarative description of an index.
///
/// A key spec is an ordered list of `(path, direction)` pairs, a uniqueness flag
/// and a name. Paths may traverse embedded documents and fan out over arrays at
/// any segment; see [`KeySpec::realize`].
///
/// Two ways to build one:
///
/// ```rust,ignore
/// let spec = KeySpec::builder().asc("orgId").asc("arr.val").name("testArrValAndOrgId").build()?;
///
/// // from a key document, nested mappings flatten to dotted paths
/// let spec = KeySpec::from_document(&doc! { arr: { val: 1 }, name: 1 }, &unique_index().name("testIndex"))?;
/// ```
///
/// Entries of a key document are taken in key order, since documents keep their
/// fields sorted. Use the builder when field order matters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeySpec {
    inner: Arc<KeySpecInner>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct KeySpecInner {
    fields: Vec<KeyField>,
    unique: bool,
    name: String,
}

impl KeySpec {
    pub fn builder() -> KeySpecBuilder {
        KeySpecBuilder::default()
    }

    /// Builds a key spec from a key document such as `{ orgId: 1, arr: { val: -1 } }`.
    ///
    /// Fields come out in key order, not in the order they were written:
    /// `{ orgId: 1, arr: { val: 1 } }` yields `arr.val, orgId`, with default
    /// name `arr.val:1|orgId:1`. Use [KeySpec::builder] to fix the field order.
    ///
    /// # Errors
    ///
    /// `ValidationError` for a direction other than `1`/`-1` or an empty embedded
    /// mapping, `InvalidFieldName` for an empty key document.
    pub fn from_document(keys: &Document, options: &IndexOptions) -> DocStoreResult<KeySpec> {
        let mut builder = KeySpec::builder().unique(options.is_unique());
        if let Some(name) = options.index_name() {
            builder = builder.name(name);
        }

        let mut flattened = Vec::new();
        flatten_keys(keys, "", &mut flattened)?;
        for (path, order) in flattened {
            builder = builder.field(&path, order);
        }
        builder.build()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_unique(&self) -> bool {
        self.inner.unique
    }

    pub fn fields(&self) -> &[KeyField] {
        &self.inner.fields
    }

    pub fn field_names(&self) -> Vec<String> {
        self.inner.fields.iter().map(|f| f.path.clone()).collect()
    }

    pub fn field_count(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn position_of(&self, path: &str) -> Option<usize> {
        self.inner.fields.iter().position(|f| f.path == path)
    }

    /// Same fields, directions and uniqueness. Names are not compared.
    pub fn same_definition(&self, other: &KeySpec) -> bool {
        self.inner.unique == other.inner.unique && self.inner.fields == other.inner.fields
    }

    /// The name used when none is given: `path:direction` pairs joined by `|`.
    pub fn default_name(&self) -> String {
        default_name(&self.inner.fields)
    }
}

impl Display for KeySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.inner.name, self.default_name())?;
        if self.inner.unique {
            write!(f, " unique")?;
        }
        Ok(())
    }
}

fn default_name(fields: &[KeyField]) -> String {
    fields
        .iter()
        .map(|f| format!("{}{}{}", f.path, DIRECTION_SEPARATOR, f.order.direction()))
        .join(NAME_SEPARATOR)
}

fn flatten_keys(keys: &Document, prefix: &str, out: &mut Vec<(String, SortOrder)>) -> DocStoreResult<()> {
    for (key, value) in keys.iter() {
        let path = if prefix.is_empty() {
            key
        } else {
            format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
        };

        match value {
            Value::Document(nested) if nested.is_empty() => {
                log::error!("Empty key mapping for index field '{}'", path);
                return Err(DocStoreError::new(
                    &format!("Empty key mapping for index field '{}'", path),
                    ErrorKind::ValidationError,
                ));
            }
            Value::Document(nested) => flatten_keys(&nested, &path, out)?,
            other => {
                let order = direction_of(&other).ok_or_else(|| {
                    log::error!("Invalid direction {} for index field '{}'", other, path);
                    DocStoreError::new(
                        &format!("Invalid direction {} for index field '{}', expected 1 or -1", other, path),
                        ErrorKind::ValidationError,
                    )
                })?;
                out.push((path, order));
            }
        }
    }
    Ok(())
}

fn direction_of(value: &Value) -> Option<SortOrder> {
    match value {
        Value::I64(d) => SortOrder::from_direction(*d),
        Value::F64(d) if *d == 1.0 => Some(SortOrder::Ascending),
        Value::F64(d) if *d == -1.0 => Some(SortOrder::Descending),
        _ => None,
    }
}

/// Builder for [KeySpec]. Fields keep the order they are added in.
#[derive(Debug, Default)]
pub struct KeySpecBuilder {
    fields: Vec<(String, SortOrder)>,
    unique: bool,
    name: Option<String>,
}

impl KeySpecBuilder {
    pub fn asc(self, path: &str) -> Self {
        self.field(path, SortOrder::Ascending)
    }

    pub fn desc(self, path: &str) -> Self {
        self.field(path, SortOrder::Descending)
    }

    pub fn field(mut self, path: &str, order: SortOrder) -> Self {
        self.fields.push((path.to_string(), order));
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn build(self) -> DocStoreResult<KeySpec> {
        if self.fields.is_empty() {
            log::error!("Index must have at least one key field");
            return Err(DocStoreError::new(
                "Index must have at least one key field",
                ErrorKind::InvalidFieldName,
            ));
        }

        let mut fields: Vec<KeyField> = Vec::with_capacity(self.fields.len());
        for (path, order) in &self.fields {
            if fields.iter().any(|f| &f.path == path) {
                log::error!("Index field '{}' listed more than once", path);
                return Err(DocStoreError::new(
                    &format!("Index field '{}' listed more than once", path),
                    ErrorKind::ValidationError,
                ));
            }
            fields.push(KeyField::new(path, *order)?);
        }

        let name = match self.name {
            Some(name) if name.is_empty() => {
                log::error!("Index name cannot be empty");
                return Err(DocStoreError::new("Index name cannot be empty", ErrorKind::ValidationError));
            }
            Some(name) => name,
            None => default_name(&fields),
        };

        Ok(KeySpec {
            inner: Arc::new(KeySpecInner {
                fields,
                unique: self.unique,
                name,
            }),
        })
    }
}
