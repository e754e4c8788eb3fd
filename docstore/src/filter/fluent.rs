use crate::collection::Document;
use crate::common::{Value, DOC_ID, OP_EQ, OP_EXISTS, OP_IN, OP_NE};

/// Matches every document.
pub fn all() -> Document {
    Document::new()
}

/// Matches the document with the given `_id`.
pub fn by_id(id: &str) -> Document {
    Document::new().with_entry(DOC_ID, Value::from(id))
}

/// Starts a filter on a dotted field path.
///
/// ```rust,ignore
/// let bobs = collection.find(&field("name").eq("Bob"), &FindOptions::default())?;
/// let not_bob = field("name").ne("Bob");
/// ```
pub fn field(path: &str) -> FluentFilter {
    FluentFilter {
        path: path.to_string(),
    }
}

pub struct FluentFilter {
    path: String,
}

impl FluentFilter {
    pub fn eq<T: Into<Value>>(self, value: T) -> Document {
        self.operator(OP_EQ, value.into())
    }

    pub fn ne<T: Into<Value>>(self, value: T) -> Document {
        self.operator(OP_NE, value.into())
    }

    pub fn is_in<T: Into<Value>>(self, values: Vec<T>) -> Document {
        self.operator(OP_IN, Value::from(values))
    }

    pub fn exists(self, exists: bool) -> Document {
        self.operator(OP_EXISTS, Value::Bool(exists))
    }

    fn operator(self, operator: &str, operand: Value) -> Document {
        let constraint = Document::new().with_entry(operator, operand);
        Document::new().with_entry(&self.path, Value::Document(constraint))
    }
}
