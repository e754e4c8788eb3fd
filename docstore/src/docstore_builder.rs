//! Builder for [DocStore].

use std::time::Duration;

use crate::docstore::DocStore;
use crate::docstore_config::DocStoreConfig;
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};

/// Collects settings and opens a [DocStore].
///
/// An invalid setting is remembered and reported by [DocStoreBuilder::open];
/// later settings are ignored once one has failed.
///
/// ```rust
/// use std::time::Duration;
/// use docstore::docstore::DocStore;
///
/// let store = DocStore::builder()
///     .decouple_results(true)
///     .slow_query_threshold(Duration::from_millis(100))
///     .open()
///     .unwrap();
/// assert!(store.config().decouple_results());
/// ```
pub struct DocStoreBuilder {
    error: Option<DocStoreError>,
    decouple_results: bool,
    slow_query_threshold: Option<Duration>,
}

impl Default for DocStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocStoreBuilder {
    pub fn new() -> Self {
        DocStoreBuilder {
            error: None,
            decouple_results: true,
            slow_query_threshold: None,
        }
    }

    /// Default of `FindOptions::decouple` for every collection of the store.
    pub fn decouple_results(mut self, decouple_results: bool) -> Self {
        if self.error.is_none() {
            self.decouple_results = decouple_results;
        }
        self
    }

    /// Finds slower than `threshold` are logged at warn level. Must be non zero.
    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        if self.error.is_none() {
            if threshold.is_zero() {
                log::error!("Slow query threshold must be greater than zero");
                self.error = Some(DocStoreError::new(
                    "Slow query threshold must be greater than zero",
                    ErrorKind::ValidationError,
                ));
            } else {
                self.slow_query_threshold = Some(threshold);
            }
        }
        self
    }

    pub fn open(self) -> DocStoreResult<DocStore> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let config = DocStoreConfig::new(self.decouple_results, self.slow_query_threshold);
        Ok(DocStore::new(config))
    }
}
