//! Expression model
//!
//! Immutable, value-comparable representations of the constraints a request can
//! carry: filters, sort orders, pagination, sparse field sets and inclusion
//! trees, plus the scoped-constraint envelope they arrive in.
//!
//! All types render in JSON:API query-string notation via `Display` and
//! (de)serialize as JSON for constraint files.

mod constraint;
mod field_chain;
mod filter;
mod include;
mod pagination;
mod sort;
mod sparse;

pub use constraint::{ConstraintSource, QueryExpression, ScopedConstraint};
pub use field_chain::{FieldChain, Literal};
pub use filter::{ComparisonOperator, FilterExpression, LogicalOperator, Operand, TextMatchKind};
pub use include::{merge_elements, IncludeElement, IncludeExpression};
pub use pagination::{PageNumber, PageSize, PaginationExpression};
pub use sort::{SortElement, SortExpression, SortTarget};
pub use sparse::{SparseFieldSet, SparseFieldTable};
