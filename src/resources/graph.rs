//! Resource graph: the field/relationship catalog the composer consults
//!
//! The composer only depends on the [`ResourceGraph`] trait. The in-memory
//! implementation is built programmatically with [`ResourceGraphBuilder`] or
//! loaded from definition files.

use std::collections::BTreeMap;

use crate::expressions::FieldChain;

use super::errors::{GraphError, GraphResult};
use super::types::{FieldRef, RelationshipDef, ResourceType};

/// Fields visited while navigating a chain
#[derive(Debug, Clone)]
pub struct ResolvedChain<'g> {
    pub fields: Vec<FieldRef<'g>>,
    /// Type the chain ends in: the related type when the last field is a
    /// relationship, the owning type when it is an attribute
    pub target: &'g ResourceType,
}

impl<'g> ResolvedChain<'g> {
    /// The last field, if the chain is not empty
    pub fn last(&self) -> Option<FieldRef<'g>> {
        self.fields.last().copied()
    }

    /// Relationship at the end of the chain, if any
    pub fn last_relationship(&self) -> Option<&'g RelationshipDef> {
        match self.last() {
            Some(FieldRef::Relationship(relationship)) => Some(relationship),
            _ => None,
        }
    }
}

/// Read-only resource metadata provider
pub trait ResourceGraph {
    /// Looks up a resource type by name
    fn resource_type(&self, name: &str) -> Option<&ResourceType>;

    /// Looks up a resource type, failing when it does not exist
    fn require_type(&self, name: &str) -> GraphResult<&ResourceType> {
        self.resource_type(name)
            .ok_or_else(|| GraphError::UnknownResourceType(name.to_string()))
    }

    /// The relationship on the target type that points back, if declared
    fn inverse_of(&self, relationship: &RelationshipDef) -> Option<&RelationshipDef> {
        let inverse = relationship.inverse.as_deref()?;
        self.resource_type(&relationship.target)?.relationship(inverse)
    }

    /// Navigates `chain` starting at `origin`.
    ///
    /// Every field must exist on the type reached so far, and only the last
    /// field may be an attribute.
    fn resolve_chain<'g>(
        &'g self,
        origin: &'g ResourceType,
        chain: &FieldChain,
    ) -> GraphResult<ResolvedChain<'g>> {
        let mut current = origin;
        let mut fields = Vec::with_capacity(chain.len());

        for (position, name) in chain.fields().iter().enumerate() {
            let field = current.field(name).ok_or_else(|| GraphError::UnknownField {
                resource_type: current.name.clone(),
                field: name.clone(),
            })?;

            match field {
                FieldRef::Attribute(_) if position + 1 < chain.len() => {
                    return Err(GraphError::AttributeInChain {
                        resource_type: current.name.clone(),
                        field: name.clone(),
                    });
                }
                FieldRef::Attribute(_) => {}
                FieldRef::Relationship(relationship) => {
                    current = self.require_type(&relationship.target)?;
                }
            }
            fields.push(field);
        }

        Ok(ResolvedChain {
            fields,
            target: current,
        })
    }
}

/// Resource graph held in memory, keyed by type name
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceGraph {
    types: BTreeMap<String, ResourceType>,
}

impl InMemoryResourceGraph {
    pub fn builder() -> ResourceGraphBuilder {
        ResourceGraphBuilder::default()
    }

    /// All resource types, ordered by name
    pub fn types(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ResourceGraph for InMemoryResourceGraph {
    fn resource_type(&self, name: &str) -> Option<&ResourceType> {
        self.types.get(name)
    }
}

/// Collects resource types and validates cross-references on build
#[derive(Debug, Clone, Default)]
pub struct ResourceGraphBuilder {
    types: Vec<ResourceType>,
}

impl ResourceGraphBuilder {
    pub fn add(mut self, resource_type: ResourceType) -> Self {
        self.types.push(resource_type);
        self
    }

    pub fn push(&mut self, resource_type: ResourceType) {
        self.types.push(resource_type);
    }

    /// Validates every definition and every relationship reference.
    pub fn build(self) -> GraphResult<InMemoryResourceGraph> {
        let mut types = BTreeMap::new();

        for resource_type in self.types {
            resource_type
                .validate_structure()
                .map_err(|reason| GraphError::InvalidDefinition {
                    resource_type: resource_type.name.clone(),
                    reason,
                })?;

            if types.contains_key(&resource_type.name) {
                return Err(GraphError::DuplicateResourceType(resource_type.name));
            }
            types.insert(resource_type.name.clone(), resource_type);
        }

        let graph = InMemoryResourceGraph { types };
        for resource_type in graph.types() {
            validate_references(&graph, resource_type)?;
        }

        Ok(graph)
    }
}

fn validate_references(graph: &InMemoryResourceGraph, resource_type: &ResourceType) -> GraphResult<()> {
    if let Some(base) = &resource_type.base_type {
        if graph.resource_type(base).is_none() {
            return Err(GraphError::InvalidDefinition {
                resource_type: resource_type.name.clone(),
                reason: format!("base type '{}' does not exist", base),
            });
        }
    }

    for relationship in &resource_type.relationships {
        let target = graph.resource_type(&relationship.target).ok_or_else(|| {
            GraphError::UnknownRelationshipTarget {
                resource_type: resource_type.name.clone(),
                relationship: relationship.name.clone(),
                target: relationship.target.clone(),
            }
        })?;

        if let Some(inverse_name) = &relationship.inverse {
            let points_back = target.relationship(inverse_name).is_some_and(|inverse| {
                inverse.target == resource_type.name
                    || resource_type.base_type.as_deref() == Some(inverse.target.as_str())
            });

            if !points_back {
                return Err(GraphError::InverseMismatch {
                    resource_type: resource_type.name.clone(),
                    relationship: relationship.name.clone(),
                    inverse: inverse_name.clone(),
                });
            }
        }
    }

    Ok(())
}
