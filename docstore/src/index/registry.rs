use indexmap::IndexMap;

use crate::index::Index;

/// Ordered mapping from index name to [Index] for one collection.
///
/// Registration order is preserved; the planner uses it to break ties.
#[derive(Default)]
pub struct IndexRegistry {
    indexes: IndexMap<String, Index>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        IndexRegistry::default()
    }

    /// Registers `index` unless its name is taken, returning whichever index
    /// holds the name afterwards and whether it was newly registered.
    pub fn ensure(&mut self, index: Index) -> (Index, bool) {
        match self.indexes.get(index.name()) {
            Some(existing) => (existing.clone(), false),
            None => {
                self.indexes.insert(index.name().to_string(), index.clone());
                (index, true)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Index> {
        self.indexes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    /// Removes the index, keeping the relative order of the rest.
    pub fn deregister(&mut self, name: &str) -> Option<Index> {
        self.indexes.shift_remove(name)
    }

    pub fn clear(&mut self) -> Vec<Index> {
        self.indexes.drain(..).map(|(_, index)| index).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Index> {
        self.indexes.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.indexes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}
