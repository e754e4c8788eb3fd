use indexmap::IndexSet;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{Debug, Display};
use std::sync::Arc;

use crate::collection::Document;
use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};
use crate::index::multikey::resolve_path;
use crate::index::{CompositeKey, KeySpec};

#[derive(Default)]
struct IndexState {
    entries: BTreeMap<CompositeKey, BTreeSet<String>>,
    // keys recorded per document, so removal never depends on the current document contents
    by_doc: HashMap<String, Vec<CompositeKey>>,
}

/// A secondary index over one [KeySpec].
///
/// Maps every realized [CompositeKey] to the set of document ids producing it.
/// A unique index keeps at most one id per key. Documents with every key field
/// missing are not indexed.
///
/// `Index` is a cheap handle; clones share the same entries. Only the owning
/// collection mutates an index.
#[derive(Clone)]
pub struct Index {
    inner: Arc<IndexInner>,
}

struct IndexInner {
    spec: KeySpec,
    state: Atomic<IndexState>,
}

impl Index {
    pub(crate) fn new(spec: KeySpec) -> Self {
        Index {
            inner: Arc::new(IndexInner {
                spec,
                state: atomic(IndexState::default()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.spec.name()
    }

    pub fn key_spec(&self) -> &KeySpec {
        &self.inner.spec
    }

    pub fn is_unique(&self) -> bool {
        self.inner.spec.is_unique()
    }

    /// Number of distinct documents indexed.
    pub fn size(&self) -> usize {
        self.inner.state.read_with(|state| state.by_doc.len())
    }

    /// Number of distinct composite keys.
    pub fn entry_count(&self) -> usize {
        self.inner.state.read_with(|state| state.entries.len())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.state.read_with(|state| state.by_doc.contains_key(id))
    }

    /// Returns the ids of documents whose keys match `probe`.
    ///
    /// Only key fields present in `probe` constrain the result. When the probe
    /// supplies every key field the matching buckets are read directly,
    /// otherwise entries are scanned and filtered on the supplied fields. Ids
    /// come back in key order, each once.
    ///
    /// ```rust,ignore
    /// let ids = index.lookup(&doc! { arr: { val: 5 }, name: "Dean" });
    /// ```
    pub fn lookup(&self, probe: &Document) -> Vec<String> {
        let spec = &self.inner.spec;
        let supplied: Vec<(usize, _)> = spec
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, field)| probe.contains_field(field.path()))
            .map(|(position, field)| (position, resolve_path(probe, field.segments())))
            .collect();

        self.inner.state.read_with(|state| {
            let mut ids: IndexSet<String> = IndexSet::new();
            if supplied.len() == spec.field_count() {
                let mut keys: Vec<CompositeKey> = spec.realize(probe).collect();
                keys.sort();
                keys.dedup();
                for key in keys {
                    if let Some(bucket) = state.entries.get(&key) {
                        ids.extend(bucket.iter().cloned());
                    }
                }
            } else {
                for (key, bucket) in state.entries.iter() {
                    let matched = supplied.iter().all(|(position, values)| {
                        values.iter().any(|value| key.part_matches(*position, value))
                    });
                    if matched {
                        ids.extend(bucket.iter().cloned());
                    }
                }
            }
            ids.into_iter().collect()
        })
    }

    /// Every indexed id, in key order.
    pub fn ids(&self) -> Vec<String> {
        self.inner.state.read_with(|state| {
            let ids: IndexSet<String> = state.entries.values().flatten().cloned().collect();
            ids.into_iter().collect()
        })
    }

    /// The keys `document` would occupy. Empty when every key field is missing.
    pub(crate) fn keys_for(&self, document: &Document) -> Vec<CompositeKey> {
        let mut keys: Vec<CompositeKey> = self.inner.spec.realize(document).collect();
        if keys.len() == 1 && keys[0].is_all_missing() {
            keys.clear();
        }
        keys
    }

    /// Checks that `id` may occupy `keys` without mutating anything.
    pub(crate) fn validate(&self, id: &str, keys: &[CompositeKey]) -> DocStoreResult<()> {
        if !self.is_unique() {
            return Ok(());
        }

        self.inner.state.read_with(|state| {
            for key in keys {
                if let Some(bucket) = state.entries.get(key) {
                    if let Some(owner) = bucket.iter().find(|owner| owner.as_str() != id) {
                        log::debug!(
                            "Key {} of unique index '{}' already maps to document {}",
                            key,
                            self.name(),
                            owner
                        );
                        return Err(DocStoreError::new(
                            &format!(
                                "Duplicate key {} for unique index '{}', already used by document {}",
                                key,
                                self.name(),
                                owner
                            ),
                            ErrorKind::DuplicateKey,
                        ));
                    }
                }
            }
            Ok(())
        })
    }

    /// Records `keys` for `id` without a uniqueness check.
    pub(crate) fn commit(&self, id: &str, keys: Vec<CompositeKey>) {
        if keys.is_empty() {
            return;
        }

        self.inner.state.write_with(|state| {
            for key in keys.iter() {
                state.entries.entry(key.clone()).or_default().insert(id.to_string());
            }
            let recorded = state.by_doc.entry(id.to_string()).or_default();
            for key in keys {
                if !recorded.contains(&key) {
                    recorded.push(key);
                }
            }
        })
    }

    /// Validates then commits the keys of `document` under `id`.
    pub(crate) fn insert(&self, id: &str, document: &Document) -> DocStoreResult<()> {
        let keys = self.keys_for(document);
        self.validate(id, &keys)?;
        self.commit(id, keys);
        Ok(())
    }

    /// Checks that every key recorded for `id` still points back at it.
    pub(crate) fn verify(&self, id: &str) -> DocStoreResult<()> {
        self.inner.state.read_with(|state| {
            let keys = match state.by_doc.get(id) {
                Some(keys) => keys,
                None => return Ok(()),
            };
            for key in keys {
                let present = state.entries.get(key).map(|b| b.contains(id)).unwrap_or(false);
                if !present {
                    return Err(self.invariant_violation(id, key));
                }
            }
            Ok(())
        })
    }

    /// Drops every entry of `id`, returning the keys it occupied.
    pub(crate) fn remove(&self, id: &str) -> DocStoreResult<Vec<CompositeKey>> {
        self.inner.state.write_with(|state| {
            let keys = match state.by_doc.remove(id) {
                Some(keys) => keys,
                None => return Ok(Vec::new()),
            };

            let mut broken = None;
            for key in keys.iter() {
                let emptied = match state.entries.get_mut(key) {
                    Some(bucket) if bucket.contains(id) => {
                        bucket.remove(id);
                        bucket.is_empty()
                    }
                    _ => {
                        broken.get_or_insert_with(|| key.clone());
                        false
                    }
                };
                if emptied {
                    state.entries.remove(key);
                }
            }

            match broken {
                Some(key) => Err(self.invariant_violation(id, &key)),
                None => Ok(keys),
            }
        })
    }

    pub(crate) fn clear(&self) {
        self.inner.state.write_with(|state| {
            state.entries.clear();
            state.by_doc.clear();
        })
    }

    fn invariant_violation(&self, id: &str, key: &CompositeKey) -> DocStoreError {
        log::error!(
            "Index '{}' records key {} for document {} but its entry does not contain it",
            self.name(),
            key,
            id
        );
        DocStoreError::new(
            &format!(
                "Index '{}' is out of sync for document {} at key {}",
                self.name(),
                id,
                key
            ),
            ErrorKind::InvariantViolation,
        )
    }

    #[cfg(test)]
    pub(crate) fn corrupt_entry(&self, id: &str) {
        self.inner.state.write_with(|state| {
            for bucket in state.entries.values_mut() {
                bucket.remove(id);
            }
        })
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("spec", &self.inner.spec)
            .field("size", &self.size())
            .finish()
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.spec)
    }
}
