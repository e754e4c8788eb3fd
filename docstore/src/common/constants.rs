// doc constants
pub const DOC_ID: &str = "_id";

// path constants
pub const FIELD_SEPARATOR: &str = ".";

// index constants
pub const UNIQUE_INDEX: &str = "unique";
pub const NON_UNIQUE_INDEX: &str = "non-unique";
pub const NAME_SEPARATOR: &str = "|";
pub const DIRECTION_SEPARATOR: &str = ":";

// filter operators
pub const OP_EQ: &str = "$eq";
pub const OP_NE: &str = "$ne";
pub const OP_IN: &str = "$in";
pub const OP_EXISTS: &str = "$exists";
pub const OPERATOR_PREFIX: char = '$';
