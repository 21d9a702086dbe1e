//! Observable composition events
//!
//! Every log record the engine emits carries one of these names in its
//! `event` field, so log consumers can filter on a closed vocabulary.

use std::fmt;

/// Observable events during plan composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeEvent {
    // Composition lifecycle
    /// A composition entry point was invoked
    ComposeStart,
    /// A plan was produced
    ComposeComplete,

    // Include expansion
    /// A relationship was added to a parent selection
    IncludeExpanded,
    /// A relationship was already selected and was not expanded again
    IncludeSkippedDuplicate,

    // Constraints
    /// A scoped constraint was never consumed by the composed plan
    ConstraintUnused,
    /// A sparse field set was resolved for a resource type
    SparseFieldsResolved,
    /// A count filter for a secondary endpoint was built
    SecondaryFilterBuilt,
    /// An expression was rejected by validation
    ExpressionRejected,

    // Metadata
    /// Resource definitions were loaded
    GraphLoaded,
}

impl ComposeEvent {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeEvent::ComposeStart => "COMPOSE_START",
            ComposeEvent::ComposeComplete => "COMPOSE_COMPLETE",
            ComposeEvent::IncludeExpanded => "INCLUDE_EXPANDED",
            ComposeEvent::IncludeSkippedDuplicate => "INCLUDE_SKIPPED_DUPLICATE",
            ComposeEvent::ConstraintUnused => "CONSTRAINT_UNUSED",
            ComposeEvent::SparseFieldsResolved => "SPARSE_FIELDS_RESOLVED",
            ComposeEvent::SecondaryFilterBuilt => "SECONDARY_FILTER_BUILT",
            ComposeEvent::ExpressionRejected => "EXPRESSION_REJECTED",
            ComposeEvent::GraphLoaded => "GRAPH_LOADED",
        }
    }

    /// Returns true if this event reports a rejected request
    pub fn is_rejection(&self) -> bool {
        matches!(self, ComposeEvent::ExpressionRejected)
    }
}

impl fmt::Display for ComposeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
