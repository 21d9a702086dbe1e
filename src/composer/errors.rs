//! Composition error types
//!
//! Error codes:
//! - COMPOSE_UNSUPPORTED_FILTER (bad request)
//! - COMPOSE_UNSUPPORTED_INCLUDE (bad request)
//! - COMPOSE_UNKNOWN_FIELD (configuration)
//! - COMPOSE_UNKNOWN_RESOURCE_TYPE (configuration)
//! - COMPOSE_INVALID_RELATIONSHIP (configuration)
//! - COMPOSE_HOOK_CONTRACT (configuration)

use std::fmt;

use thiserror::Error;

use crate::expressions::FieldChain;
use crate::resources::GraphError;

/// Who is at fault for a failed composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request asks for something the backend cannot execute
    BadRequest,
    /// Resource metadata or a customization hook is inconsistent
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::BadRequest => write!(f, "BAD_REQUEST"),
            ErrorCategory::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// Composition error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeErrorCode {
    /// Filter shape the backend cannot execute
    UnsupportedFilter,
    /// Include tree the backend cannot execute
    UnsupportedInclude,
    /// Field chain names a field that does not exist
    UnknownField,
    /// Resource type not present in the graph
    UnknownResourceType,
    /// Relationship missing or of the wrong kind for the operation
    InvalidRelationship,
    /// A customization hook returned an incompatible value
    HookContract,
}

impl ComposeErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ComposeErrorCode::UnsupportedFilter => "COMPOSE_UNSUPPORTED_FILTER",
            ComposeErrorCode::UnsupportedInclude => "COMPOSE_UNSUPPORTED_INCLUDE",
            ComposeErrorCode::UnknownField => "COMPOSE_UNKNOWN_FIELD",
            ComposeErrorCode::UnknownResourceType => "COMPOSE_UNKNOWN_RESOURCE_TYPE",
            ComposeErrorCode::InvalidRelationship => "COMPOSE_INVALID_RELATIONSHIP",
            ComposeErrorCode::HookContract => "COMPOSE_HOOK_CONTRACT",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ComposeErrorCode::UnsupportedFilter | ComposeErrorCode::UnsupportedInclude => {
                ErrorCategory::BadRequest
            }
            ComposeErrorCode::UnknownField
            | ComposeErrorCode::UnknownResourceType
            | ComposeErrorCode::InvalidRelationship
            | ComposeErrorCode::HookContract => ErrorCategory::Configuration,
        }
    }
}

impl fmt::Display for ComposeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Composition error with positional context
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "[{}] {}: {}{}",
    .code.category(),
    .code,
    .message,
    context_suffix(.resource_type.as_deref(), .scope.as_ref())
)]
pub struct ComposeError {
    code: ComposeErrorCode,
    message: String,
    resource_type: Option<String>,
    scope: Option<FieldChain>,
}

fn context_suffix(resource_type: Option<&str>, scope: Option<&FieldChain>) -> String {
    match (resource_type, scope) {
        (Some(rt), Some(scope)) => format!(" (resource type '{}', scope '{}')", rt, scope),
        (Some(rt), None) => format!(" (resource type '{}')", rt),
        (None, Some(scope)) => format!(" (scope '{}')", scope),
        (None, None) => String::new(),
    }
}

impl ComposeError {
    fn new(code: ComposeErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            resource_type: None,
            scope: None,
        }
    }

    /// Create an unsupported filter error
    pub fn unsupported_filter(resource_type: &str, filter: impl fmt::Display) -> Self {
        Self::new(
            ComposeErrorCode::UnsupportedFilter,
            format!("Filter '{}' requires a join, which this backend cannot execute", filter),
        )
        .with_resource_type(resource_type)
    }

    /// Create an unsupported include error
    pub fn unsupported_include(resource_type: &str, include: impl fmt::Display) -> Self {
        Self::new(
            ComposeErrorCode::UnsupportedInclude,
            format!("Include '{}' is nested deeper than this backend can execute", include),
        )
        .with_resource_type(resource_type)
    }

    /// Create an unknown field error
    pub fn unknown_field(resource_type: &str, field: &str) -> Self {
        Self::new(
            ComposeErrorCode::UnknownField,
            format!("Field '{}' does not exist on resource type '{}'", field, resource_type),
        )
        .with_resource_type(resource_type)
    }

    /// Create an unknown resource type error
    pub fn unknown_resource_type(name: &str) -> Self {
        Self::new(
            ComposeErrorCode::UnknownResourceType,
            format!("Resource type '{}' is not registered", name),
        )
    }

    /// Create an invalid relationship error
    pub fn invalid_relationship(resource_type: &str, relationship: &str, reason: &str) -> Self {
        Self::new(
            ComposeErrorCode::InvalidRelationship,
            format!("Relationship '{}': {}", relationship, reason),
        )
        .with_resource_type(resource_type)
    }

    /// Create a hook contract violation error
    pub fn hook_contract(resource_type: &str, reason: impl Into<String>) -> Self {
        Self::new(ComposeErrorCode::HookContract, reason).with_resource_type(resource_type)
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Attaches the relationship chain being composed, if not already set
    pub fn with_scope(mut self, scope: Option<&FieldChain>) -> Self {
        if self.scope.is_none() {
            self.scope = scope.cloned();
        }
        self
    }

    pub fn code(&self) -> ComposeErrorCode {
        self.code
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    pub fn scope(&self) -> Option<&FieldChain> {
        self.scope.as_ref()
    }

    /// HTTP status the surrounding pipeline should answer with
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::BadRequest => 400,
            ErrorCategory::Configuration => 500,
        }
    }

    /// Short client-facing title
    pub fn title(&self) -> &'static str {
        match self.code {
            ComposeErrorCode::UnsupportedFilter => "Unsupported filter expression.",
            ComposeErrorCode::UnsupportedInclude => "Unsupported include expression.",
            _ => "An unhandled error occurred while composing the query.",
        }
    }

    /// Client-facing detail
    pub fn detail(&self) -> String {
        match (&self.resource_type, &self.scope) {
            (_, Some(scope)) => format!("{} (at '{}')", self.message, scope),
            _ => self.message.clone(),
        }
    }
}

impl From<GraphError> for ComposeError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownResourceType(name) => ComposeError::unknown_resource_type(&name),
            GraphError::UnknownField { resource_type, field } => {
                ComposeError::unknown_field(&resource_type, &field)
            }
            GraphError::AttributeInChain { resource_type, field } => ComposeError::new(
                ComposeErrorCode::UnknownField,
                format!("Field '{}' is an attribute and cannot be navigated", field),
            )
            .with_resource_type(resource_type),
            other => ComposeError::new(ComposeErrorCode::UnknownResourceType, other.to_string()),
        }
    }
}

/// Result type for composition
pub type ComposeResult<T> = Result<T, ComposeError>;
