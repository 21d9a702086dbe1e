//! Per-type viewable field cache
//!
//! The set of fields a client may ever see depends only on the resource type
//! definition, so it is computed once per type and shared across requests.
//! The cache is owned by the application and handed to each composer.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;

use super::types::ResourceType;

/// Concurrent map from resource type name to its viewable field names
#[derive(Debug, Default)]
pub struct ViewableFieldCache {
    entries: DashMap<String, Arc<BTreeSet<String>>>,
}

impl ViewableFieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the viewable fields of `resource_type`, computing them on first
    /// use. Concurrent callers for the same type observe the same set.
    pub fn get_or_compute(&self, resource_type: &ResourceType) -> Arc<BTreeSet<String>> {
        if let Some(existing) = self.entries.get(&resource_type.name) {
            return Arc::clone(existing.value());
        }

        let entry = self
            .entries
            .entry(resource_type.name.clone())
            .or_insert_with(|| Arc::new(viewable_fields(resource_type)));
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn viewable_fields(resource_type: &ResourceType) -> BTreeSet<String> {
    resource_type
        .fields()
        .filter(|field| !field.is_view_blocked())
        .map(|field| field.name().to_string())
        .collect()
}
