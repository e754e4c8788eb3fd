//! Shared building blocks: values, ordering, constants and lock helpers.

mod comparator;
mod constants;
mod sort_order;
mod util;
mod value;

pub use comparator::*;
pub use constants::*;
pub use sort_order::*;
pub use util::*;
pub use value::*;
