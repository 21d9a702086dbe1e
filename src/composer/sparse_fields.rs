//! Sparse field set resolution
//!
//! Three contexts per resource type:
//! - for-query: memoized; request set passed through the hook, hook output
//!   wins. Empty means no restriction.
//! - for-relationship: never memoized; identity only, through the hook, with
//!   identity re-added afterward.
//! - for-serializer: memoized separately; baseline is the request set or all
//!   viewable fields, intersected with hook output, identity always present.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::trace;

use crate::expressions::{ScopedConstraint, SparseFieldSet};
use crate::observability::ComposeEvent;
use crate::resources::{ResourceType, ViewableFieldCache};

use super::errors::{ComposeError, ComposeResult};
use super::hooks::ResourceHooks;

/// Per-composer memo tables over the request's sparse field sets
#[derive(Debug, Default)]
pub(crate) struct SparseFieldSetCache {
    requested: BTreeMap<String, SparseFieldSet>,
    for_query: HashMap<String, Option<SparseFieldSet>>,
    for_serializer: HashMap<String, SparseFieldSet>,
}

impl SparseFieldSetCache {
    /// Merges the sparse field tables of all constraints, across all scopes
    pub fn new(constraints: &[ScopedConstraint]) -> Self {
        let mut requested: BTreeMap<String, SparseFieldSet> = BTreeMap::new();

        let tables = constraints
            .iter()
            .filter_map(|constraint| constraint.expression.as_sparse_field_table());
        for table in tables {
            for (resource_type, set) in table.iter() {
                let merged = requested.remove(resource_type).unwrap_or_default();
                let merged = set.fields().iter().fold(merged, |acc, field| acc.with(field.clone()));
                requested.insert(resource_type.clone(), merged);
            }
        }

        Self {
            requested,
            ..Default::default()
        }
    }

    /// Clears the memo tables; the merged request sets are kept
    pub fn reset(&mut self) {
        self.for_query.clear();
        self.for_serializer.clear();
    }

    /// Field set restricting what is fetched. `None` means all default fields.
    pub fn for_query<H: ResourceHooks + ?Sized>(
        &mut self,
        hooks: &H,
        resource_type: &ResourceType,
    ) -> ComposeResult<Option<SparseFieldSet>> {
        if let Some(cached) = self.for_query.get(&resource_type.name) {
            return Ok(cached.clone());
        }

        let requested = self.requested.get(&resource_type.name).cloned();
        if let Some(requested) = &requested {
            if let Some(unknown) = first_unknown_field(resource_type, requested) {
                return Err(ComposeError::unknown_field(&resource_type.name, unknown));
            }
        }

        let resolved = hooks
            .apply_sparse_field_set(resource_type, requested)
            .map(|set| check_hook_output(resource_type, set))
            .transpose()?
            .filter(|set| !set.is_empty());

        trace!(
            event = %ComposeEvent::SparseFieldsResolved,
            context = "query",
            resource_type = %resource_type.name,
            fields = %resolved.as_ref().map(ToString::to_string).unwrap_or_else(|| "*".into()),
            "sparse field set resolved"
        );

        self.for_query
            .insert(resource_type.name.clone(), resolved.clone());
        Ok(resolved)
    }

    /// Field set for the right-hand side of a relationship id lookup
    pub fn for_relationship<H: ResourceHooks + ?Sized>(
        &self,
        hooks: &H,
        resource_type: &ResourceType,
    ) -> ComposeResult<SparseFieldSet> {
        let identity_only = SparseFieldSet::new([resource_type.identity()]);

        let resolved = hooks
            .apply_sparse_field_set(resource_type, Some(identity_only))
            .map(|set| check_hook_output(resource_type, set))
            .transpose()?
            .unwrap_or_default()
            .with(resource_type.identity());

        trace!(
            event = %ComposeEvent::SparseFieldsResolved,
            context = "relationship",
            resource_type = %resource_type.name,
            fields = %resolved,
            "sparse field set resolved"
        );
        Ok(resolved)
    }

    /// Field set the serializer may render
    pub fn for_serializer<H: ResourceHooks + ?Sized>(
        &mut self,
        hooks: &H,
        resource_type: &ResourceType,
        viewable_fields: &ViewableFieldCache,
    ) -> ComposeResult<SparseFieldSet> {
        if let Some(cached) = self.for_serializer.get(&resource_type.name) {
            return Ok(cached.clone());
        }

        let baseline = match self.requested.get(&resource_type.name) {
            Some(requested) => requested.clone(),
            None => SparseFieldSet::from((*viewable_fields.get_or_compute(resource_type)).clone()),
        };

        let narrowed = match hooks.apply_sparse_field_set(resource_type, Some(baseline.clone())) {
            Some(output) => {
                let output = check_hook_output(resource_type, output)?;
                let kept: BTreeSet<String> = baseline
                    .fields()
                    .intersection(output.fields())
                    .cloned()
                    .collect();
                SparseFieldSet::from(kept)
            }
            None => baseline,
        };
        let resolved = narrowed.with(resource_type.identity());

        trace!(
            event = %ComposeEvent::SparseFieldsResolved,
            context = "serializer",
            resource_type = %resource_type.name,
            fields = %resolved,
            "sparse field set resolved"
        );

        self.for_serializer
            .insert(resource_type.name.clone(), resolved.clone());
        Ok(resolved)
    }
}

fn first_unknown_field<'s>(resource_type: &ResourceType, set: &'s SparseFieldSet) -> Option<&'s str> {
    set.fields()
        .iter()
        .map(String::as_str)
        .find(|field| !resource_type.has_field(field))
}

fn check_hook_output(resource_type: &ResourceType, set: SparseFieldSet) -> ComposeResult<SparseFieldSet> {
    match first_unknown_field(resource_type, &set) {
        Some(unknown) => Err(ComposeError::hook_contract(
            &resource_type.name,
            format!(
                "sparse field set hook returned field '{}', which does not exist on '{}'",
                unknown, resource_type.name
            ),
        )),
        None => Ok(set),
    }
}
