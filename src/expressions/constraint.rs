//! Scoped constraints: the composer's only input format

use serde::{Deserialize, Serialize};

use super::field_chain::FieldChain;
use super::filter::FilterExpression;
use super::include::IncludeExpression;
use super::pagination::PaginationExpression;
use super::sort::SortExpression;
use super::sparse::SparseFieldTable;

/// Any constraint a source can supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum QueryExpression {
    Filter(FilterExpression),
    Sort(SortExpression),
    Pagination(PaginationExpression),
    SparseFieldTable(SparseFieldTable),
    Include(IncludeExpression),
}

impl QueryExpression {
    pub fn as_filter(&self) -> Option<&FilterExpression> {
        match self {
            QueryExpression::Filter(filter) => Some(filter),
            _ => None,
        }
    }

    pub fn as_sort(&self) -> Option<&SortExpression> {
        match self {
            QueryExpression::Sort(sort) => Some(sort),
            _ => None,
        }
    }

    pub fn as_pagination(&self) -> Option<&PaginationExpression> {
        match self {
            QueryExpression::Pagination(pagination) => Some(pagination),
            _ => None,
        }
    }

    pub fn as_sparse_field_table(&self) -> Option<&SparseFieldTable> {
        match self {
            QueryExpression::SparseFieldTable(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_include(&self) -> Option<&IncludeExpression> {
        match self {
            QueryExpression::Include(include) => Some(include),
            _ => None,
        }
    }
}

/// A constraint together with the relationship path it applies to.
///
/// `scope = None` targets the request's primary resource type; otherwise the
/// scope names the relationship path from the primary type down to the type the
/// expression targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopedConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<FieldChain>,
    pub expression: QueryExpression,
}

impl ScopedConstraint {
    /// Constraint on the primary resource type
    pub fn top(expression: QueryExpression) -> Self {
        Self {
            scope: None,
            expression,
        }
    }

    /// Constraint on the resource type reached through `scope`
    pub fn scoped(scope: impl Into<FieldChain>, expression: QueryExpression) -> Self {
        Self {
            scope: Some(scope.into()),
            expression,
        }
    }

    /// True when this constraint applies exactly at `scope`
    pub fn applies_to(&self, scope: Option<&FieldChain>) -> bool {
        self.scope.as_ref() == scope
    }
}

/// Supplies the constraints for the current request.
///
/// Invoked once per composer; the result is enumerated eagerly.
pub trait ConstraintSource {
    fn constraints(&self) -> Vec<ScopedConstraint>;
}

impl ConstraintSource for Vec<ScopedConstraint> {
    fn constraints(&self) -> Vec<ScopedConstraint> {
        self.clone()
    }
}

impl ConstraintSource for [ScopedConstraint] {
    fn constraints(&self) -> Vec<ScopedConstraint> {
        self.to_vec()
    }
}

/// Concatenates several sources in order (query string, defaults, ...)
impl<S: ConstraintSource> ConstraintSource for [&S] {
    fn constraints(&self) -> Vec<ScopedConstraint> {
        self.iter().flat_map(|source| source.constraints()).collect()
    }
}
