//! Per-resource-type customization hooks
//!
//! Hooks are pure synchronous callbacks that may narrow, replace or extend what
//! the request asked for. Every method defaults to returning its input.

use std::collections::{BTreeSet, HashMap};

use crate::expressions::{
    FilterExpression, IncludeElement, PaginationExpression, SortExpression, SparseFieldSet,
};
use crate::resources::ResourceType;

/// Customization callbacks consulted during composition
pub trait ResourceHooks {
    fn apply_filter(
        &self,
        _resource_type: &ResourceType,
        filter: Option<FilterExpression>,
    ) -> Option<FilterExpression> {
        filter
    }

    fn apply_sort(&self, _resource_type: &ResourceType, sort: Option<SortExpression>) -> Option<SortExpression> {
        sort
    }

    fn apply_pagination(
        &self,
        _resource_type: &ResourceType,
        pagination: Option<PaginationExpression>,
    ) -> Option<PaginationExpression> {
        pagination
    }

    /// The returned set must only name fields of `resource_type`
    fn apply_sparse_field_set(
        &self,
        _resource_type: &ResourceType,
        field_set: Option<SparseFieldSet>,
    ) -> Option<SparseFieldSet> {
        field_set
    }

    /// Invoked for every expanded type, even when `elements` is empty.
    /// Returned elements must name relationships of `resource_type`.
    fn apply_includes(
        &self,
        _resource_type: &ResourceType,
        elements: BTreeSet<IncludeElement>,
    ) -> BTreeSet<IncludeElement> {
        elements
    }
}

/// Hooks that change nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ResourceHooks for NoHooks {}

type BoxedHooks = Box<dyn ResourceHooks + Send + Sync>;

/// Dispatches to hooks registered per resource type name.
/// Types without registered hooks are left unchanged.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, BoxedHooks>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers hooks for a resource type, replacing earlier ones
    pub fn register(
        mut self,
        resource_type: impl Into<String>,
        hooks: impl ResourceHooks + Send + Sync + 'static,
    ) -> Self {
        self.hooks.insert(resource_type.into(), Box::new(hooks));
        self
    }

    fn for_type(&self, resource_type: &ResourceType) -> &dyn ResourceHooks {
        match self.hooks.get(&resource_type.name) {
            Some(hooks) => hooks.as_ref(),
            None => &NoHooks,
        }
    }
}

impl ResourceHooks for HookRegistry {
    fn apply_filter(
        &self,
        resource_type: &ResourceType,
        filter: Option<FilterExpression>,
    ) -> Option<FilterExpression> {
        self.for_type(resource_type).apply_filter(resource_type, filter)
    }

    fn apply_sort(&self, resource_type: &ResourceType, sort: Option<SortExpression>) -> Option<SortExpression> {
        self.for_type(resource_type).apply_sort(resource_type, sort)
    }

    fn apply_pagination(
        &self,
        resource_type: &ResourceType,
        pagination: Option<PaginationExpression>,
    ) -> Option<PaginationExpression> {
        self.for_type(resource_type).apply_pagination(resource_type, pagination)
    }

    fn apply_sparse_field_set(
        &self,
        resource_type: &ResourceType,
        field_set: Option<SparseFieldSet>,
    ) -> Option<SparseFieldSet> {
        self.for_type(resource_type)
            .apply_sparse_field_set(resource_type, field_set)
    }

    fn apply_includes(
        &self,
        resource_type: &ResourceType,
        elements: BTreeSet<IncludeElement>,
    ) -> BTreeSet<IncludeElement> {
        self.for_type(resource_type).apply_includes(resource_type, elements)
    }
}
