//! Secondary indexes.
//!
//! An index is declared by a [KeySpec]: ordered field paths with directions,
//! a uniqueness flag and a name. Each document realizes one or more
//! [CompositeKey]s against the spec (one per combination of array elements met
//! along the paths) and the [Index] maps every key to the ids producing it.
//!
//! ```rust,ignore
//! use docstore::index::unique_index;
//!
//! let users = Collection::new("users");
//! users.ensure_index(&doc! { name: 1 }, &unique_index().name("uniqueName"));
//! let index = users.index("uniqueName").unwrap();
//! assert_eq!(index.size(), 0);
//! ```

mod composite_key;
mod descriptor;
mod secondary_index;
mod multikey;
mod options;
mod registry;

pub use composite_key::*;
pub use descriptor::*;
pub use secondary_index::*;
pub use multikey::CompositeKeys;
pub use options::*;
pub use registry::*;
