//! Sparse field sets
//!
//! A sparse field set restricts which fields of a resource type are fetched and
//! rendered. Members are single field names, mirroring `fields[type]=a,b`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Set of field names for one resource type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparseFieldSet {
    fields: BTreeSet<String>,
}

impl SparseFieldSet {
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &BTreeSet<String> {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Adds a field, returning a new set
    pub fn with(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into());
        self
    }

    /// Removes a field, returning a new set
    pub fn without(mut self, field: &str) -> Self {
        self.fields.remove(field);
        self
    }

    pub fn into_fields(self) -> BTreeSet<String> {
        self.fields
    }
}

impl fmt::Display for SparseFieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        write!(f, "{}", joined.join(","))
    }
}

impl From<BTreeSet<String>> for SparseFieldSet {
    fn from(fields: BTreeSet<String>) -> Self {
        Self { fields }
    }
}

/// Sparse field sets keyed by resource type name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparseFieldTable {
    table: BTreeMap<String, SparseFieldSet>,
}

impl SparseFieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the set for a resource type
    pub fn with_set(mut self, resource_type: impl Into<String>, set: SparseFieldSet) -> Self {
        self.table.insert(resource_type.into(), set);
        self
    }

    pub fn get(&self, resource_type: &str) -> Option<&SparseFieldSet> {
        self.table.get(resource_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SparseFieldSet)> {
        self.table.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Display for SparseFieldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (resource_type, set)) in self.table.iter().enumerate() {
            if i > 0 {
                write!(f, "&")?;
            }
            write!(f, "fields[{}]={}", resource_type, set)?;
        }
        Ok(())
    }
}
