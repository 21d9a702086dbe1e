//! CLI-specific error types
//!
//! All CLI errors are fatal: printed as `CODE: message`, exit code 1.

use std::fmt;
use std::io;

use crate::composer::{ComposeError, OptionsError};
use crate::resources::GraphError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Options file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Constraint file could not be parsed
    InvalidConstraints,
    /// Resource graph could not be loaded
    GraphError,
    /// Composition rejected the request; carries the composer's code
    Compose(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLI_CONFIG_ERROR",
            Self::IoError => "CLI_IO_ERROR",
            Self::InvalidConstraints => "CLI_INVALID_CONSTRAINTS",
            Self::GraphError => "CLI_GRAPH_ERROR",
            Self::Compose(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_constraints(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidConstraints, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<OptionsError> for CliError {
    fn from(e: OptionsError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<GraphError> for CliError {
    fn from(e: GraphError) -> Self {
        Self::new(CliErrorCode::GraphError, format!("{}: {}", e.code(), e))
    }
}

impl From<ComposeError> for CliError {
    fn from(e: ComposeError) -> Self {
        Self::new(CliErrorCode::Compose(e.code().code()), e.detail())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
