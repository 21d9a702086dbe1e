//! Resource type definitions
//!
//! A resource type declares its identity field, its attributes and its
//! relationships. Definitions are plain data and (de)serialize from the JSON
//! files read by [`ResourceGraphLoader`](super::ResourceGraphLoader).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

fn default_identity() -> String {
    "id".to_string()
}

/// Cardinality of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    ToOne,
    ToMany,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::ToOne => "to-one",
            RelationshipKind::ToMany => "to-many",
        }
    }
}

/// Attribute definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDef {
    pub name: String,
    /// Never rendered to clients
    #[serde(default)]
    pub view_blocked: bool,
}

impl AttributeDef {
    /// Create a viewable attribute
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view_blocked: false,
        }
    }

    /// Create an attribute that is never rendered to clients
    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view_blocked: true,
        }
    }
}

/// Relationship definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDef {
    pub name: String,
    pub kind: RelationshipKind,
    /// Name of the related resource type
    pub target: String,
    /// Relationship on the target type that points back here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,
    /// Stored inside the owning document (no join needed on join-less backends)
    #[serde(default)]
    pub embedded: bool,
    #[serde(default)]
    pub view_blocked: bool,
}

impl RelationshipDef {
    /// Create a to-one relationship
    pub fn to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationshipKind::ToOne, target)
    }

    /// Create a to-many relationship
    pub fn to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationshipKind::ToMany, target)
    }

    fn new(name: impl Into<String>, kind: RelationshipKind, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.into(),
            inverse: None,
            embedded: false,
            view_blocked: false,
        }
    }

    /// Declares the inverse relationship on the target type
    pub fn with_inverse(mut self, inverse: impl Into<String>) -> Self {
        self.inverse = Some(inverse.into());
        self
    }

    /// Marks the relationship as owned/embedded
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Marks the relationship as never rendered to clients
    pub fn hidden(mut self) -> Self {
        self.view_blocked = true;
        self
    }

    pub fn is_to_many(&self) -> bool {
        self.kind == RelationshipKind::ToMany
    }
}

/// Reference to either kind of field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Attribute(&'a AttributeDef),
    Relationship(&'a RelationshipDef),
}

impl<'a> FieldRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            FieldRef::Attribute(attribute) => &attribute.name,
            FieldRef::Relationship(relationship) => &relationship.name,
        }
    }

    pub fn is_view_blocked(&self) -> bool {
        match self {
            FieldRef::Attribute(attribute) => attribute.view_blocked,
            FieldRef::Relationship(relationship) => relationship.view_blocked,
        }
    }
}

/// A resource type with its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    pub name: String,
    /// Name of the identity attribute
    #[serde(default = "default_identity")]
    pub identity: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDef>,
    /// Base type for derived (polymorphic) resource types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
}

impl ResourceType {
    /// Create a resource type with an `id` identity attribute
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity: default_identity(),
            attributes: vec![AttributeDef::new(default_identity())],
            relationships: Vec::new(),
            base_type: None,
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeDef) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds viewable attributes by name
    pub fn with_attributes<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.attributes.extend(names.into_iter().map(AttributeDef::new));
        self
    }

    pub fn with_relationship(mut self, relationship: RelationshipDef) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn derived_from(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    /// Name of the identity attribute
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipDef> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Looks up an attribute or relationship by name
    pub fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        self.attribute(name)
            .map(FieldRef::Attribute)
            .or_else(|| self.relationship(name).map(FieldRef::Relationship))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// All fields, attributes first, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = FieldRef<'_>> {
        self.attributes
            .iter()
            .map(FieldRef::Attribute)
            .chain(self.relationships.iter().map(FieldRef::Relationship))
    }

    /// Validates the definition itself (not its references to other types)
    pub fn validate_structure(&self) -> Result<(), String> {
        let identity = self
            .attribute(&self.identity)
            .ok_or_else(|| format!("identity field '{}' must be declared as an attribute", self.identity))?;

        if identity.view_blocked {
            return Err(format!("identity field '{}' cannot be view-blocked", self.identity));
        }

        let mut seen = HashSet::new();
        for field in self.fields() {
            if !seen.insert(field.name()) {
                return Err(format!("field '{}' is declared more than once", field.name()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles() -> ResourceType {
        ResourceType::new("articles")
            .with_attributes(["title", "body"])
            .with_attribute(AttributeDef::hidden("internalNotes"))
            .with_relationship(RelationshipDef::to_one("author", "people").with_inverse("articles"))
            .with_relationship(RelationshipDef::to_many("comments", "comments"))
    }

    #[test]
    fn test_field_lookup() {
        let rt = articles();
        assert!(matches!(rt.field("title"), Some(FieldRef::Attribute(_))));
        assert!(matches!(rt.field("author"), Some(FieldRef::Relationship(_))));
        assert!(rt.field("missing").is_none());
        assert_eq!(rt.identity(), "id");
    }

    #[test]
    fn test_structure_valid() {
        assert!(articles().validate_structure().is_ok());
    }

    #[test]
    fn test_missing_identity_rejected() {
        let mut rt = articles();
        rt.identity = "key".into();
        let err = rt.validate_structure().unwrap_err();
        assert!(err.contains("identity"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let rt = articles().with_relationship(RelationshipDef::to_one("title", "people"));
        let err = rt.validate_structure().unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn test_definition_json_defaults() {
        let rt: ResourceType = serde_json::from_str(
            r#"{
                "name": "tags",
                "attributes": [{ "name": "id" }, { "name": "label" }],
                "relationships": [
                    { "name": "articles", "kind": "toMany", "target": "articles", "inverse": "tags" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(rt.identity(), "id");
        let rel = rt.relationship("articles").unwrap();
        assert!(rel.is_to_many());
        assert!(!rel.embedded);
        assert_eq!(rel.inverse.as_deref(), Some("tags"));
    }
}
