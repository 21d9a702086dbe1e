//! Composer configuration

use std::fs;
use std::num::NonZeroU32;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expressions::PageSize;

/// Storage backend class the composed plans are executed on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageBackend {
    /// Supports joins; plans are not restricted
    #[default]
    Relational,
    /// No join capability; plans are validated for simplicity
    Joinless,
}

/// Composer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerOptions {
    /// Page size when neither the request nor a hook supplies one (default: 10)
    #[serde(default = "default_page_size")]
    pub default_page_size: PageSize,

    /// Backend class (default: relational)
    #[serde(default)]
    pub backend: StorageBackend,

    /// Build the count filter for to-many secondary endpoints (default: true)
    #[serde(default = "default_include_total_resource_count")]
    pub include_total_resource_count: bool,
}

fn default_page_size() -> PageSize {
    PageSize::Bounded(NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN))
}

fn default_include_total_resource_count() -> bool {
    true
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            backend: StorageBackend::default(),
            include_total_resource_count: default_include_total_resource_count(),
        }
    }
}

/// Options loading errors
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Failed to read options file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid options: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl ComposerOptions {
    /// Options for a join-less backend
    pub fn joinless() -> Self {
        Self {
            backend: StorageBackend::Joinless,
            ..Default::default()
        }
    }

    pub fn with_default_page_size(mut self, page_size: PageSize) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let content = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn is_joinless(&self) -> bool {
        self.backend == StorageBackend::Joinless
    }
}
