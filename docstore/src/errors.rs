use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for docstore operations.
///
/// Recoverable kinds (`DuplicateKey`, `InvalidId`, `IndexNotFound`) usually travel
/// inside structured operation results. `InvariantViolation` is fatal and is always
/// returned as an `Err`.
///
/// # Examples
///
/// ```rust,ignore
/// use docstore::errors::{DocStoreError, ErrorKind, DocStoreResult};
///
/// fn example() -> DocStoreResult<()> {
///     Err(DocStoreError::new("Index not found", ErrorKind::IndexNotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A unique index already maps the composite key to another document
    DuplicateKey,
    /// Index does not exist
    IndexNotFound,
    /// An index with the same name but a different key spec exists
    IndexAlreadyExists,
    /// Failed to build or rebuild an index
    IndexBuildFailed,
    /// Document store and index contents disagree
    InvariantViolation,
    /// The provided `_id` is invalid
    InvalidId,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Invalid field name or path
    InvalidFieldName,
    /// Generic validation error
    ValidationError,
    /// Error during filter evaluation
    FilterError,
    /// Collection does not exist
    CollectionNotFound,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::DuplicateKey => write!(f, "Duplicate key"),
            ErrorKind::IndexNotFound => write!(f, "Index not found"),
            ErrorKind::IndexAlreadyExists => write!(f, "Index already exists"),
            ErrorKind::IndexBuildFailed => write!(f, "Index build failed"),
            ErrorKind::InvariantViolation => write!(f, "Invariant violation"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::CollectionNotFound => write!(f, "Collection not found"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

impl ErrorKind {
    /// Returns `true` for conditions that batch operations fold into their
    /// results instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorKind::DuplicateKey
                | ErrorKind::InvalidId
                | ErrorKind::IndexNotFound
                | ErrorKind::IndexAlreadyExists
                | ErrorKind::IndexBuildFailed
        )
    }
}

/// Error type of the crate.
///
/// `DocStoreError` carries a message, an [ErrorKind], an optional cause and a
/// backtrace captured at construction. The backtrace is resolved lazily, only
/// when the error is debug-printed.
///
/// # Examples
///
/// ```rust,ignore
/// use docstore::errors::{DocStoreError, ErrorKind};
///
/// let cause = DocStoreError::new("duplicate key 'Bob'", ErrorKind::DuplicateKey);
/// let err = DocStoreError::new_with_cause("Index build failed", ErrorKind::IndexBuildFailed, cause);
/// assert_eq!(err.cause().map(|c| c.kind()), Some(&ErrorKind::DuplicateKey));
/// ```
#[derive(Clone)]
pub struct DocStoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DocStoreError>>,
    backtrace: Atomic<Backtrace>,
}

impl DocStoreError {
    /// Creates a new error with the specified message and kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DocStoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    /// Creates a new error chained to the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DocStoreError) -> Self {
        DocStoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&DocStoreError> {
        self.cause.as_deref()
    }

    /// Returns the resolved backtrace captured when the error was created.
    pub fn backtrace(&self) -> Backtrace {
        let mut backtrace = self.backtrace.write();
        backtrace.resolve();
        backtrace.clone()
    }
}

impl Display for DocStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DocStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} ({})\nCaused by: {:?}", self.message, self.error_kind, cause),
            None => write!(f, "{} ({})\n{:?}", self.message, self.error_kind, self.backtrace()),
        }
    }
}

impl Error for DocStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for docstore operations.
pub type DocStoreResult<T> = Result<T, DocStoreError>;

impl From<std::fmt::Error> for DocStoreError {
    fn from(err: std::fmt::Error) -> Self {
        DocStoreError::new(&format!("Formatting error: {}", err), ErrorKind::InternalError)
    }
}
