//! Plan validation for join-less backends
//!
//! A join-less backend can only filter on attributes of the document itself
//! or of relationships embedded in it, and can only include one level of
//! relationships.

use tracing::warn;

use crate::expressions::{FieldChain, FilterExpression, IncludeExpression, Operand};
use crate::observability::ComposeEvent;
use crate::plan::QueryPlanNode;
use crate::resources::{FieldRef, ResourceGraph, ResourceType};

use super::errors::{ComposeError, ComposeResult};

pub(crate) struct JoinlessValidator<'g, G: ResourceGraph + ?Sized> {
    graph: &'g G,
}

impl<'g, G: ResourceGraph + ?Sized> JoinlessValidator<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// True when every chain in `filter` stays within the document.
    ///
    /// The flag latches to false; remaining branches are still visited.
    pub fn is_simple(&self, resource_type: &ResourceType, filter: &FilterExpression) -> bool {
        let mut simple = true;
        self.visit_filter(resource_type, filter, &mut simple);
        simple
    }

    pub fn validate_filter(&self, resource_type: &ResourceType, filter: &FilterExpression) -> ComposeResult<()> {
        if self.is_simple(resource_type, filter) {
            return Ok(());
        }

        warn!(
            event = %ComposeEvent::ExpressionRejected,
            resource_type = %resource_type.name,
            filter = %filter,
            "filter requires a join"
        );
        Err(ComposeError::unsupported_filter(&resource_type.name, filter))
    }

    pub fn validate_include(&self, resource_type: &ResourceType, include: &IncludeExpression) -> ComposeResult<()> {
        if include.depth() <= 1 {
            return Ok(());
        }

        warn!(
            event = %ComposeEvent::ExpressionRejected,
            resource_type = %resource_type.name,
            include = %include,
            "include nested too deep"
        );
        Err(ComposeError::unsupported_include(&resource_type.name, include))
    }

    /// Validates the filter of every node in the tree
    pub fn validate_plan(&self, node: &QueryPlanNode) -> ComposeResult<()> {
        if let Some(filter) = &node.filter {
            let resource_type = self.graph.require_type(&node.resource_type)?;
            self.validate_filter(resource_type, filter)?;
        }

        if let Some(selection) = &node.selection {
            for (_, nested) in selection.relationships() {
                self.validate_plan(nested)?;
            }
        }
        Ok(())
    }

    fn visit_filter(&self, resource_type: &ResourceType, filter: &FilterExpression, simple: &mut bool) {
        match filter {
            FilterExpression::Comparison { left, right, .. } => {
                self.visit_operand(resource_type, left, simple);
                self.visit_operand(resource_type, right, simple);
            }
            FilterExpression::Logical { terms, .. } => {
                for term in terms {
                    self.visit_filter(resource_type, term, simple);
                }
            }
            FilterExpression::Not { filter } => self.visit_filter(resource_type, filter, simple),
            FilterExpression::AnyOf { target, .. } | FilterExpression::MatchText { target, .. } => {
                self.visit_chain(resource_type, target, simple);
            }
            FilterExpression::Has { target, filter } => {
                let related = self.visit_chain(resource_type, target, simple);
                if let (Some(related), Some(inner)) = (related, filter) {
                    self.visit_filter(related, inner, simple);
                }
            }
            FilterExpression::IsType {
                target,
                derived_type,
                filter,
            } => {
                if let Some(target) = target {
                    self.visit_chain(resource_type, target, simple);
                }
                if let (Some(derived), Some(inner)) = (self.graph.resource_type(derived_type), filter) {
                    self.visit_filter(derived, inner, simple);
                }
            }
        }
    }

    fn visit_operand(&self, resource_type: &ResourceType, operand: &Operand, simple: &mut bool) {
        match operand {
            Operand::Field(chain) | Operand::Count(chain) => {
                self.visit_chain(resource_type, chain, simple);
            }
            Operand::Literal(_) | Operand::Null => {}
        }
    }

    /// Walks a chain and returns the type it ends in, if it ends in a
    /// relationship. Unknown fields are reported by metadata checks, not here.
    fn visit_chain<'r>(
        &'r self,
        resource_type: &'r ResourceType,
        chain: &FieldChain,
        simple: &mut bool,
    ) -> Option<&'r ResourceType> {
        let mut current = resource_type;
        for name in chain.fields() {
            match current.field(name)? {
                FieldRef::Attribute(_) => return None,
                FieldRef::Relationship(relationship) => {
                    if !relationship.embedded {
                        *simple = false;
                    }
                    current = self.graph.resource_type(&relationship.target)?;
                }
            }
        }
        Some(current)
    }
}
