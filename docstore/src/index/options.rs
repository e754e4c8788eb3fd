/// Options accepted by `ensure_index`.
///
/// ```rust,ignore
/// collection.ensure_index(&doc! { name: 1 }, &unique_index().name("uniqueName"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexOptions {
    unique: bool,
    name: Option<String>,
}

impl IndexOptions {
    pub fn new(unique: bool) -> IndexOptions {
        IndexOptions { unique, name: None }
    }

    /// Names the index. Without a name one is derived from the key fields.
    pub fn name(mut self, name: &str) -> IndexOptions {
        self.name = Some(name.to_string());
        self
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn index_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

pub fn unique_index() -> IndexOptions {
    IndexOptions::new(true)
}

pub fn non_unique_index() -> IndexOptions {
    IndexOptions::new(false)
}
