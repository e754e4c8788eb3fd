use std::collections::HashMap;

use crate::collection::{Document, FindOptions, FindPlan};
use crate::common::{Value, DOC_ID};
use crate::errors::DocStoreResult;
use crate::filter::equality_constraints;
use crate::index::{Index, IndexRegistry};

/// Chooses the index serving a filter.
///
/// An index is a candidate when every one of its key fields carries an
/// equality constraint in the filter. Among candidates the one with the most
/// key fields wins; on a tie the earliest registered index wins.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FindOptimizer;

impl FindOptimizer {
    pub(crate) fn new() -> Self {
        FindOptimizer
    }

    pub(crate) fn create_find_plan(
        &self,
        filter: &Document,
        find_options: &FindOptions,
        registry: &IndexRegistry,
    ) -> DocStoreResult<FindPlan> {
        let constraints = usable_constraints(filter);

        let potential: Vec<Index> = registry
            .iter()
            .filter(|index| {
                index
                    .key_spec()
                    .fields()
                    .iter()
                    .all(|field| constraints.contains_key(field.path()))
            })
            .cloned()
            .collect();

        let mut plan = FindPlan {
            potential,
            ..FindPlan::default()
        };

        if find_options.is_skip_index() {
            log::debug!("Index skipped on request, {} potential", plan.potential.len());
            return Ok(plan);
        }

        let mut used: Option<&Index> = None;
        for index in plan.potential.iter() {
            let better = match used {
                Some(best) => index.key_spec().field_count() > best.key_spec().field_count(),
                None => true,
            };
            if better {
                used = Some(index);
            }
        }

        match used.cloned() {
            Some(index) => {
                let mut probe = Document::new();
                for field in index.key_spec().fields() {
                    if let Some(value) = constraints.get(field.path()) {
                        probe.put(field.path(), value.clone())?;
                    }
                }
                log::debug!(
                    "Using index '{}' out of {} potential, probe {}",
                    index.name(),
                    plan.potential.len(),
                    probe
                );
                plan.probe = Some(probe);
                plan.used = Some(index);
            }
            None => {
                plan.by_id = constraints
                    .get(DOC_ID)
                    .and_then(|value| value.as_string())
                    .map(str::to_string);
            }
        }
        Ok(plan)
    }
}

/// Equality constraints an index can serve, first value per path.
///
/// Null and array values are left out: a null matches missing fields, which
/// are not indexed, and an array also matches by whole-array equality.
fn usable_constraints(filter: &Document) -> HashMap<String, Value> {
    let mut constraints = HashMap::new();
    for (path, value) in equality_constraints(filter) {
        if value.is_null() || value.is_array() {
            continue;
        }
        constraints.entry(path).or_insert(value);
    }
    constraints
}
