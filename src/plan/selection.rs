//! Field selection table
//!
//! Maps field names to either "selected" (attributes, `None`) or a nested plan
//! node (included relationships). A relationship appears at most once.

use std::collections::BTreeMap;

use serde::Serialize;

use super::node::QueryPlanNode;

/// Per-resource-type field selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldSelection {
    fields: BTreeMap<String, Option<QueryPlanNode>>,
}

impl FieldSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection of the given attributes
    pub fn of_attributes<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut selection = Self::new();
        for name in names {
            selection.include_attribute(name);
        }
        selection
    }

    /// Selects an attribute. An existing entry under the same name is kept.
    pub fn include_attribute(&mut self, name: impl Into<String>) {
        self.fields.entry(name.into()).or_insert(None);
    }

    /// Registers a relationship with its nested plan.
    ///
    /// Returns false and leaves the table unchanged when the field is already
    /// present.
    pub fn include_relationship(&mut self, name: impl Into<String>, node: QueryPlanNode) -> bool {
        let name = name.into();
        if self.fields.contains_key(&name) {
            return false;
        }
        self.fields.insert(name, Some(node));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Nested plan registered for a relationship
    pub fn relationship(&self, name: &str) -> Option<&QueryPlanNode> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    pub fn relationship_mut(&mut self, name: &str) -> Option<&mut QueryPlanNode> {
        self.fields.get_mut(name).and_then(Option::as_mut)
    }

    /// Names of fields selected without a nested plan
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, node)| node.is_none())
            .map(|(name, _)| name.as_str())
    }

    /// Relationships with their nested plans
    pub fn relationships(&self) -> impl Iterator<Item = (&str, &QueryPlanNode)> {
        self.fields
            .iter()
            .filter_map(|(name, node)| node.as_ref().map(|node| (name.as_str(), node)))
    }

    /// Drops every entry without a nested plan
    pub fn remove_attributes(&mut self) {
        self.fields.retain(|_, node| node.is_some());
    }

    pub fn remove(&mut self, name: &str) -> Option<Option<QueryPlanNode>> {
        self.fields.remove(name)
    }

    /// True when the table only carries relationships, which leaves the
    /// attribute selection at its default (all attributes)
    pub fn contains_only_relationships(&self) -> bool {
        !self.fields.is_empty() && self.fields.values().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_registered_once() {
        let mut selection = FieldSelection::new();

        assert!(selection.include_relationship("author", QueryPlanNode::new("people")));
        assert!(!selection.include_relationship("author", QueryPlanNode::new("other")));

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.relationship("author").unwrap().resource_type, "people");
    }

    #[test]
    fn test_attribute_does_not_replace_relationship() {
        let mut selection = FieldSelection::new();
        selection.include_relationship("author", QueryPlanNode::new("people"));
        selection.include_attribute("author");

        assert!(selection.relationship("author").is_some());
        assert_eq!(selection.attributes().count(), 0);
    }

    #[test]
    fn test_only_relationships() {
        let mut selection = FieldSelection::of_attributes(["id", "title"]);
        selection.include_relationship("author", QueryPlanNode::new("people"));
        assert!(!selection.contains_only_relationships());

        selection.remove_attributes();
        assert!(selection.contains_only_relationships());
        assert_eq!(selection.relationships().count(), 1);

        assert!(!FieldSelection::new().contains_only_relationships());
    }
}
