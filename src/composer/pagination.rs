//! Sort and page window resolution, and the pagination report
//!
//! Precedence for both: the first matching constraint, passed through the
//! type's hook, else a default. Sort always ends up resolved.

use std::num::NonZeroU32;

use serde::Serialize;

use crate::expressions::{PageNumber, PageSize, PaginationExpression, QueryExpression, SortExpression};
use crate::resources::ResourceType;

use super::hooks::ResourceHooks;

/// Resolves the sort order for a resource type
pub(crate) fn resolve_sort<H: ResourceHooks + ?Sized>(
    hooks: &H,
    resource_type: &ResourceType,
    expressions: &[&QueryExpression],
) -> SortExpression {
    let requested = expressions
        .iter()
        .find_map(|expression| expression.as_sort())
        .cloned();

    hooks
        .apply_sort(resource_type, requested)
        .filter(|sort| !sort.elements().is_empty())
        .unwrap_or_else(|| SortExpression::ascending_by(resource_type.identity()))
}

/// Resolves the page window for a resource type
pub(crate) fn resolve_pagination<H: ResourceHooks + ?Sized>(
    hooks: &H,
    resource_type: &ResourceType,
    expressions: &[&QueryExpression],
    default_page_size: PageSize,
) -> PaginationExpression {
    let requested = expressions
        .iter()
        .find_map(|expression| expression.as_pagination())
        .copied();

    hooks
        .apply_pagination(resource_type, requested)
        .unwrap_or_else(|| PaginationExpression::first_page(default_page_size))
}

/// Page window of the primary resource collection, plus what the response
/// side learns after fetching it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationReport {
    page_number: PageNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<NonZeroU32>,
    is_page_full: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_count: Option<u64>,
}

impl PaginationReport {
    /// Fresh report for the given window
    pub(crate) fn begin(pagination: &PaginationExpression) -> Self {
        Self {
            page_number: pagination.page_number,
            page_size: pagination.page_size.limit(),
            is_page_full: false,
            total_count: None,
        }
    }

    pub fn page_number(&self) -> PageNumber {
        self.page_number
    }

    /// `None` when unbounded
    pub fn page_size(&self) -> Option<NonZeroU32> {
        self.page_size
    }

    pub fn is_page_full(&self) -> bool {
        self.is_page_full
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Records how many resources the page returned
    pub fn record_page(&mut self, returned: usize) {
        self.is_page_full = self
            .page_size
            .is_some_and(|size| returned >= size.get() as usize);
    }

    pub fn set_total_count(&mut self, total_count: u64) {
        self.total_count = Some(total_count);
    }

    /// Number of pages, known only with a total count and a bounded page size
    pub fn total_page_count(&self) -> Option<u64> {
        let total = self.total_count?;
        let size = u64::from(self.page_size?.get());
        Some(total.div_ceil(size))
    }
}
