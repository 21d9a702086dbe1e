//! Query plan nodes
//!
//! A plan node carries everything the storage layer needs to fetch one
//! resource type: filter, sort, page window and field selection. Included
//! relationships hang off the selection as nested nodes.

use serde::Serialize;

use crate::expressions::{FilterExpression, PaginationExpression, SortExpression};

use super::selection::FieldSelection;

/// Execution plan for one resource type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlanNode {
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationExpression>,
    /// `None` selects all default fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<FieldSelection>,
}

impl QueryPlanNode {
    /// Unconstrained node selecting all default fields
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            filter: None,
            sort: None,
            pagination: None,
            selection: None,
        }
    }

    pub fn with_filter(mut self, filter: Option<FilterExpression>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: Option<SortExpression>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_pagination(mut self, pagination: Option<PaginationExpression>) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_selection(mut self, selection: Option<FieldSelection>) -> Self {
        self.selection = selection;
        self
    }

    /// The selection table, created empty if absent
    pub fn selection_mut(&mut self) -> &mut FieldSelection {
        self.selection.get_or_insert_with(FieldSelection::default)
    }

    /// Nested node for an included relationship
    pub fn nested(&self, relationship: &str) -> Option<&QueryPlanNode> {
        self.selection.as_ref()?.relationship(relationship)
    }

    /// True when the selection already contains `field`
    pub fn selects(&self, field: &str) -> bool {
        self.selection.as_ref().is_some_and(|selection| selection.contains(field))
    }

    /// Replaces an empty selection with `None`
    pub fn normalize_selection(&mut self) {
        if self.selection.as_ref().is_some_and(FieldSelection::is_empty) {
            self.selection = None;
        }
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self
            .selection
            .iter()
            .flat_map(FieldSelection::relationships)
            .map(|(_, node)| node.node_count())
            .sum::<usize>()
    }
}
