//! Resource graph errors

use thiserror::Error;

/// Result type for resource graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Resource graph construction and lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    // ==================
    // Definition errors
    // ==================
    /// Two definitions share a name
    #[error("Resource type '{0}' is defined more than once")]
    DuplicateResourceType(String),

    /// A definition is structurally invalid
    #[error("Invalid definition for resource type '{resource_type}': {reason}")]
    InvalidDefinition { resource_type: String, reason: String },

    /// A relationship points at a type that does not exist
    #[error("Relationship '{resource_type}.{relationship}' targets unknown resource type '{target}'")]
    UnknownRelationshipTarget {
        resource_type: String,
        relationship: String,
        target: String,
    },

    /// A declared inverse does not exist or does not point back
    #[error("Relationship '{resource_type}.{relationship}' declares inverse '{inverse}', which does not point back")]
    InverseMismatch {
        resource_type: String,
        relationship: String,
        inverse: String,
    },

    /// A definition file could not be read or parsed
    #[error("Malformed resource definition '{path}': {reason}")]
    MalformedFile { path: String, reason: String },

    // ==================
    // Lookup errors
    // ==================
    /// No resource type with this name
    #[error("Unknown resource type '{0}'")]
    UnknownResourceType(String),

    /// Field chain names a field the resource type does not declare
    #[error("Field '{field}' does not exist on resource type '{resource_type}'")]
    UnknownField { resource_type: String, field: String },

    /// Field chain continues past an attribute
    #[error("Field '{field}' on resource type '{resource_type}' is an attribute and cannot be navigated")]
    AttributeInChain { resource_type: String, field: String },
}

impl GraphError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::DuplicateResourceType(_) => "GRAPH_DUPLICATE_RESOURCE_TYPE",
            GraphError::InvalidDefinition { .. } => "GRAPH_INVALID_DEFINITION",
            GraphError::UnknownRelationshipTarget { .. } => "GRAPH_UNKNOWN_RELATIONSHIP_TARGET",
            GraphError::InverseMismatch { .. } => "GRAPH_INVERSE_MISMATCH",
            GraphError::MalformedFile { .. } => "GRAPH_MALFORMED_FILE",
            GraphError::UnknownResourceType(_) => "GRAPH_UNKNOWN_RESOURCE_TYPE",
            GraphError::UnknownField { .. } => "GRAPH_UNKNOWN_FIELD",
            GraphError::AttributeInChain { .. } => "GRAPH_ATTRIBUTE_IN_CHAIN",
        }
    }
}
