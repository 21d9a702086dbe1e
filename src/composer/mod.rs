//! Query constraint composition
//!
//! Turns the scoped constraints of one request into a tree of
//! [`QueryPlanNode`](crate::plan::QueryPlanNode)s, consulting the resource
//! graph for metadata and per-type [`ResourceHooks`] for customization.
//!
//! # Entry points
//!
//! - [`Composer::compose`]: collection or primary resource request
//! - [`Composer::compose_by_id`]: single resource by identity
//! - [`Composer::compose_secondary`]: `/parents/{id}/relationship` endpoints
//! - [`Composer::compose_for_update_preload`]: load before update
//! - [`Composer::compose_for_relationship_right_ids`] and
//!   [`Composer::compose_for_has_many`]: relationship mutations
//!
//! A plan is rejected with a [`ComposeError`] when it references unknown
//! fields, or when the configured backend is join-less and the plan would
//! need a join.

mod composer;
mod errors;
mod hooks;
mod include_cache;
mod includes;
mod inverse;
mod joinless;
mod options;
mod pagination;
mod sparse_fields;

pub use composer::{filter_by_ids, Composer, TopFieldSelection};
pub use errors::{ComposeError, ComposeErrorCode, ComposeResult, ErrorCategory};
pub use hooks::{HookRegistry, NoHooks, ResourceHooks};
pub use include_cache::EvaluatedIncludeCache;
pub use inverse::{SecondaryEndpoint, SecondaryPlan};
pub use options::{ComposerOptions, OptionsError, StorageBackend};
pub use pagination::PaginationReport;
