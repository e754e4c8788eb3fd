//! Collections and documents.
//!
//! A [Document] is an ordered map from field names to [Value](crate::common::Value)s,
//! with dotted paths reaching into embedded documents and arrays:
//!
//! ```rust
//! use docstore::doc;
//!
//! let mut user = doc! { name: "Dean", arr: [{ val: 1 }, { val: 5 }] };
//! user.put("address.city", "Leeds").unwrap();
//! assert_eq!(user.get("arr.1.val").unwrap(), docstore::common::Value::I64(5));
//! ```
//!
//! A [Collection] stores documents under their string `_id` and keeps its
//! secondary indexes in step with every insert, update and remove. Finds are
//! planned against those indexes and report what they used:
//!
//! ```rust,ignore
//! let found = users.find(&doc! { orgId: "3" }, &FindOptions::default())?;
//! println!("{:?} via {:?}", found.ids(), found.info().index_used());
//! ```
//!
//! Finds return private copies by default. `FindOptions::new().decouple(false)`
//! returns the stored documents themselves; changing them bypasses the
//! indexes until `Collection::rebuild_index` is called.

mod docstore_collection;
mod document;
mod find_options;
mod find_plan;
mod find_result;
pub(crate) mod operation;
mod set_data_options;
pub(crate) mod store;

pub use docstore_collection::*;
pub use document::*;
pub use find_options::*;
pub use find_plan::*;
pub use find_result::*;
pub use operation::{
    EnsureIndexResult, EnsureIndexState, InsertResult, RemoveResult, SetDataResult, UpdateResult, WriteFailure,
};
pub use set_data_options::*;
