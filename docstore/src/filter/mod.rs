//! Filter matching.
//!
//! Filters are documents. `{ name: "Bob" }` selects documents whose `name` is
//! `"Bob"`, `{ arr: { val: 5 } }` selects documents with `5` under `arr.val`
//! (through arrays), and operator documents such as `{ age: { "$ne": 3 } }`
//! cover the rest. The fluent helpers build the same documents:
//!
//! ```rust,ignore
//! use docstore::filter::{field, by_id};
//!
//! let filter = field("name").eq("Bob");
//! let one = by_id("4");
//! ```
//!
//! A collection evaluates filters through a [FilterMatcher]; [EqualityMatcher]
//! is the default. The planner reads [equality_constraints] to decide which
//! indexes can serve a filter.

mod fluent;
mod matcher;

pub use fluent::*;
pub use matcher::*;
