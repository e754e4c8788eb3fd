use std::sync::Arc;
use std::time::Instant;

use super::{CollectionState, FindOptimizer};
use crate::collection::{Document, FindOptions, FindPlan, FindResult, OperationInfo};
use crate::common::{atomic, Atomic, ReadExecutor};
use crate::docstore_config::DocStoreConfig;
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};
use crate::filter::FilterMatcher;

/// Matches of a find, before decoupling.
pub(crate) struct Matches {
    pub(crate) documents: Vec<(String, Atomic<Document>)>,
    pub(crate) plan: FindPlan,
    pub(crate) scanned: usize,
}

#[derive(Clone)]
pub(crate) struct ReadOperations {
    inner: Arc<ReadOperationsInner>,
}

impl ReadOperations {
    pub(crate) fn new(collection_name: &str, config: DocStoreConfig, matcher: Arc<dyn FilterMatcher>) -> Self {
        ReadOperations {
            inner: Arc::new(ReadOperationsInner {
                collection_name: collection_name.to_string(),
                config,
                matcher,
                find_optimizer: FindOptimizer::new(),
            }),
        }
    }

    pub(crate) fn explain(
        &self,
        state: &CollectionState,
        filter: &Document,
        find_options: &FindOptions,
    ) -> DocStoreResult<FindPlan> {
        self.inner
            .find_optimizer
            .create_find_plan(filter, find_options, &state.registry)
    }

    pub(crate) fn find(
        &self,
        state: &CollectionState,
        filter: &Document,
        find_options: &FindOptions,
    ) -> DocStoreResult<FindResult> {
        self.inner.find(state, filter, find_options)
    }

    /// Stored handles of every document matching `filter`.
    pub(crate) fn find_matches(
        &self,
        state: &CollectionState,
        filter: &Document,
        find_options: &FindOptions,
    ) -> DocStoreResult<Matches> {
        self.inner.find_matches(state, filter, find_options)
    }
}

struct ReadOperationsInner {
    collection_name: String,
    config: DocStoreConfig,
    matcher: Arc<dyn FilterMatcher>,
    find_optimizer: FindOptimizer,
}

impl ReadOperationsInner {
    fn find(&self, state: &CollectionState, filter: &Document, find_options: &FindOptions) -> DocStoreResult<FindResult> {
        let started = Instant::now();
        let matches = self.find_matches(state, filter, find_options)?;

        let documents: Vec<Atomic<Document>> = if find_options.decouple_or(self.config.decouple_results()) {
            matches
                .documents
                .into_iter()
                .map(|(_, handle)| atomic(handle.read_with(|doc| doc.clone())))
                .collect()
        } else {
            matches.documents.into_iter().map(|(_, handle)| handle).collect()
        };

        let elapsed = started.elapsed();
        if let Some(threshold) = self.config.slow_query_threshold() {
            if elapsed > threshold {
                log::warn!(
                    "Slow find on '{}': {:?} for filter {} (index {})",
                    self.collection_name,
                    elapsed,
                    filter,
                    matches.plan.used().map(|index| index.name()).unwrap_or("none")
                );
            }
        }

        let info = OperationInfo {
            index_used: matches.plan.used,
            potential: matches.plan.potential,
            elapsed,
            scanned: matches.scanned,
        };
        Ok(FindResult::new(documents, info))
    }

    fn find_matches(
        &self,
        state: &CollectionState,
        filter: &Document,
        find_options: &FindOptions,
    ) -> DocStoreResult<Matches> {
        let plan = self
            .find_optimizer
            .create_find_plan(filter, find_options, &state.registry)?;

        let candidates: Vec<(String, Atomic<Document>)> = match (&plan.used, &plan.probe, &plan.by_id) {
            (Some(index), Some(probe), _) => {
                let mut candidates = Vec::new();
                for id in index.lookup(probe) {
                    match state.store.get(&id) {
                        Some(handle) => candidates.push((id, handle.clone())),
                        None => {
                            log::error!(
                                "Index '{}' of '{}' refers to unknown document {}",
                                index.name(),
                                self.collection_name,
                                id
                            );
                            return Err(DocStoreError::new(
                                &format!("Index '{}' refers to unknown document {}", index.name(), id),
                                ErrorKind::InvariantViolation,
                            ));
                        }
                    }
                }
                candidates
            }
            (_, _, Some(id)) => state
                .store
                .get(id)
                .map(|handle| (id.clone(), handle.clone()))
                .into_iter()
                .collect(),
            _ => state
                .store
                .iter()
                .map(|(id, handle)| (id.clone(), handle.clone()))
                .collect(),
        };

        let scanned = candidates.len();
        let mut documents = Vec::new();
        for (id, handle) in candidates {
            if handle.read_with(|doc| self.matcher.matches(doc, filter))? {
                documents.push((id, handle));
            }
        }

        Ok(Matches {
            documents,
            plan,
            scanned,
        })
    }
}
