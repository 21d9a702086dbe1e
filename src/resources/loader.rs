//! Resource graph loader
//!
//! Reads resource type definitions from a directory:
//! - One `<type>.json` file per resource type
//! - Non-JSON files are ignored
//! - Files are read in name order so errors are reproducible
//! - Any unreadable or invalid file fails the whole load

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::observability::ComposeEvent;

use super::errors::{GraphError, GraphResult};
use super::graph::{InMemoryResourceGraph, ResourceGraphBuilder};
use super::types::ResourceType;

fn malformed(path: &Path, reason: impl Into<String>) -> GraphError {
    GraphError::MalformedFile {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Loads a resource graph from a definitions directory
pub struct ResourceGraphLoader {
    definitions_dir: PathBuf,
}

impl ResourceGraphLoader {
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Self {
        Self {
            definitions_dir: definitions_dir.into(),
        }
    }

    pub fn definitions_dir(&self) -> &Path {
        &self.definitions_dir
    }

    /// Loads and validates every definition in the directory.
    pub fn load(&self) -> GraphResult<InMemoryResourceGraph> {
        let entries = fs::read_dir(&self.definitions_dir)
            .map_err(|e| malformed(&self.definitions_dir, format!("Failed to read directory: {}", e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| malformed(&self.definitions_dir, format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let mut builder = ResourceGraphBuilder::default();
        for path in &paths {
            builder.push(Self::read_definition(path)?);
        }

        let graph = builder.build()?;
        info!(
            event = %ComposeEvent::GraphLoaded,
            dir = %self.definitions_dir.display(),
            resource_types = graph.len(),
            "resource graph loaded"
        );
        Ok(graph)
    }

    /// Parses a JSON array of resource type definitions
    pub fn from_json_str(json: &str) -> GraphResult<InMemoryResourceGraph> {
        let types: Vec<ResourceType> = serde_json::from_str(json)
            .map_err(|e| malformed(Path::new("<inline>"), format!("Invalid JSON: {}", e)))?;

        types
            .into_iter()
            .fold(ResourceGraphBuilder::default(), ResourceGraphBuilder::add)
            .build()
    }

    /// Writes a definition as `<name>.json`, refusing to overwrite.
    pub fn save(&self, resource_type: &ResourceType) -> GraphResult<PathBuf> {
        let path = self.definitions_dir.join(format!("{}.json", resource_type.name));
        if path.exists() {
            return Err(GraphError::DuplicateResourceType(resource_type.name.clone()));
        }

        fs::create_dir_all(&self.definitions_dir)
            .map_err(|e| malformed(&self.definitions_dir, format!("Failed to create directory: {}", e)))?;

        let content = serde_json::to_string_pretty(resource_type)
            .map_err(|e| malformed(&path, format!("Failed to serialize definition: {}", e)))?;
        fs::write(&path, content).map_err(|e| malformed(&path, format!("Failed to write file: {}", e)))?;

        Ok(path)
    }

    fn read_definition(path: &Path) -> GraphResult<ResourceType> {
        let content =
            fs::read_to_string(path).map_err(|e| malformed(path, format!("Failed to read file: {}", e)))?;

        serde_json::from_str(&content).map_err(|e| malformed(path, format!("Invalid JSON: {}", e)))
    }
}
