//! Secondary endpoints
//!
//! A secondary endpoint (`/articles/1/comments`) is composed as a plan on the
//! parent type, narrowed to the parent id, that includes the requested
//! relationship. Top-scope constraints apply to the secondary type.
//!
//! For counting secondary resources a standalone filter on the secondary type
//! is derived by rewriting the parent's filter through the inverse
//! relationship.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::expressions::{
    FieldChain, FilterExpression, IncludeElement, IncludeExpression, Literal, Operand, QueryExpression,
};
use crate::observability::ComposeEvent;
use crate::plan::{FieldSelection, QueryPlanNode};
use crate::resources::{RelationshipDef, RelationshipKind, ResourceGraph, ResourceType};

use super::composer::{attribute_selection, check_filter, filter_by_ids, Composer};
use super::errors::{ComposeError, ComposeResult};
use super::hooks::ResourceHooks;
use super::joinless::JoinlessValidator;
use super::pagination::PaginationReport;

/// What a secondary endpoint returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryEndpoint {
    /// The related resources themselves (`/articles/1/comments`)
    Resources,
    /// Only their identifiers (`/articles/1/relationships/comments`)
    RelationshipIdentifiers,
}

/// Plan for a secondary endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryPlan {
    /// Plan on the parent type, with the secondary resources nested under the
    /// relationship
    pub plan: QueryPlanNode,
    /// Include tree of `plan`, rooted at the parent type
    pub include: IncludeExpression,
    /// Standalone filter on the secondary type for counting, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_filter: Option<FilterExpression>,
}

impl<'a, G, H> Composer<'a, G, H>
where
    G: ResourceGraph + ?Sized,
    H: ResourceHooks + ?Sized,
{
    /// Composes the plan for a secondary endpoint.
    pub fn compose_secondary(
        &mut self,
        primary_type: &str,
        relationship: &str,
        parent_id: impl Into<Literal>,
        endpoint: SecondaryEndpoint,
    ) -> ComposeResult<SecondaryPlan> {
        let graph = self.graph;
        let parent_id = parent_id.into();
        let parent_type = self.require_type(primary_type)?;
        let relationship = secondary_relationship(parent_type, relationship)?;
        let secondary_type = graph.require_type(&relationship.target)?;
        debug!(
            event = %ComposeEvent::ComposeStart,
            operation = "secondary",
            resource_type = %parent_type.name,
            relationship = %relationship.name,
            "composing plan"
        );
        self.begin();

        let mut secondary = self.compose_node(secondary_type, None, relationship.is_to_many())?;
        let elements = match endpoint {
            SecondaryEndpoint::Resources => {
                let include = self.top_include();
                self.expand_includes(include.into_elements(), secondary_type, &mut secondary, None)?
            }
            SecondaryEndpoint::RelationshipIdentifiers => {
                let field_set = self.sparse_fields.for_relationship(self.hooks, secondary_type)?;
                secondary.selection = Some(attribute_selection(secondary_type, &field_set));
                BTreeSet::new()
            }
        };

        let pagination_report = if relationship.is_to_many() {
            secondary.pagination.as_ref().map(PaginationReport::begin)
        } else {
            None
        };

        let parent_filter = self.hooks.apply_filter(parent_type, None);
        if let Some(filter) = &parent_filter {
            check_filter(graph, parent_type, filter)?;
        }

        let mut selection = FieldSelection::of_attributes([parent_type.identity()]);
        selection.include_relationship(&relationship.name, secondary);
        let plan = QueryPlanNode::new(&parent_type.name)
            .with_filter(filter_by_ids(parent_type.identity(), [parent_id.clone()], parent_filter))
            .with_selection(Some(selection));

        let secondary_include = IncludeExpression::new(elements.iter().cloned());
        let include = IncludeExpression::new([IncludeElement::with_children(&relationship.name, elements)]);

        if self.options.is_joinless() {
            let validator = JoinlessValidator::new(graph);
            validator.validate_include(secondary_type, &secondary_include)?;
            validator.validate_plan(&plan)?;
        }

        let secondary_filter = if relationship.is_to_many() && self.options.include_total_resource_count {
            self.secondary_filter(primary_type, &relationship.name, parent_id)?
        } else {
            None
        };

        self.pagination_report = pagination_report;
        self.finish(&plan, secondary_include);
        Ok(SecondaryPlan {
            plan,
            include,
            secondary_filter,
        })
    }

    /// Filter on the secondary type selecting the members of a parent's
    /// to-many relationship, for counting them in isolation.
    ///
    /// Returns `None` when the relationship is to-one or has no inverse.
    pub fn secondary_filter(
        &self,
        primary_type: &str,
        relationship: &str,
        parent_id: impl Into<Literal>,
    ) -> ComposeResult<Option<FilterExpression>> {
        let graph = self.graph;
        let parent_type = self.require_type(primary_type)?;
        let relationship = secondary_relationship(parent_type, relationship)?;
        if !relationship.is_to_many() {
            return Ok(None);
        }
        let Some(inverse) = graph.inverse_of(relationship) else {
            return Ok(None);
        };
        let secondary_type = graph.require_type(&relationship.target)?;

        let parent_filter = self.hooks.apply_filter(parent_type, None);
        let by_parent = match inverse.kind {
            RelationshipKind::ToOne => FilterExpression::and_optional(
                Some(FilterExpression::equals(
                    FieldChain::new([inverse.name.as_str(), parent_type.identity()]),
                    parent_id,
                )),
                parent_filter.map(|filter| rewrite_through(&filter, &inverse.name)),
            ),
            RelationshipKind::ToMany => Some(FilterExpression::has(
                inverse.name.as_str(),
                FilterExpression::and_optional(
                    Some(FilterExpression::equals(parent_type.identity(), parent_id)),
                    parent_filter,
                ),
            )),
        };

        let expressions = self.expressions_in_scope(None);
        let expressions: Vec<&QueryExpression> = expressions.iter().collect();
        let own_filter = self.resolve_filter(secondary_type, &expressions)?;

        let filter = FilterExpression::and_optional(by_parent, own_filter);
        if let Some(filter) = &filter {
            debug!(
                event = %ComposeEvent::SecondaryFilterBuilt,
                resource_type = %secondary_type.name,
                inverse = %inverse.name,
                filter = %filter,
                "secondary filter built"
            );
        }
        Ok(filter)
    }
}

fn secondary_relationship<'t>(parent_type: &'t ResourceType, relationship: &str) -> ComposeResult<&'t RelationshipDef> {
    parent_type
        .relationship(relationship)
        .ok_or_else(|| ComposeError::invalid_relationship(&parent_type.name, relationship, "is not a relationship"))
}

/// Re-roots a filter written against the parent type onto the secondary
/// type by prefixing every top-level chain with the inverse relationship.
///
/// Filters nested in `has` and `isType` are relative to their own target and
/// are left as they are.
fn rewrite_through(filter: &FilterExpression, inverse: &str) -> FilterExpression {
    match filter {
        FilterExpression::Comparison { operator, left, right } => FilterExpression::Comparison {
            operator: *operator,
            left: rewrite_operand(left, inverse),
            right: rewrite_operand(right, inverse),
        },
        FilterExpression::Logical { operator, terms } => FilterExpression::Logical {
            operator: *operator,
            terms: terms.iter().map(|term| rewrite_through(term, inverse)).collect(),
        },
        FilterExpression::Not { filter } => FilterExpression::Not {
            filter: Box::new(rewrite_through(filter, inverse)),
        },
        FilterExpression::AnyOf { target, constants } => FilterExpression::AnyOf {
            target: target.with_prefix(inverse),
            constants: constants.clone(),
        },
        FilterExpression::MatchText {
            target,
            match_kind,
            pattern,
        } => FilterExpression::MatchText {
            target: target.with_prefix(inverse),
            match_kind: *match_kind,
            pattern: pattern.clone(),
        },
        FilterExpression::Has { target, filter } => FilterExpression::Has {
            target: target.with_prefix(inverse),
            filter: filter.clone(),
        },
        FilterExpression::IsType {
            target,
            derived_type,
            filter,
        } => FilterExpression::IsType {
            target: Some(match target {
                Some(target) => target.with_prefix(inverse),
                None => FieldChain::single(inverse),
            }),
            derived_type: derived_type.clone(),
            filter: filter.clone(),
        },
    }
}

fn rewrite_operand(operand: &Operand, inverse: &str) -> Operand {
    match operand {
        Operand::Field(chain) => Operand::Field(chain.with_prefix(inverse)),
        Operand::Count(chain) => Operand::Count(chain.with_prefix(inverse)),
        Operand::Literal(_) | Operand::Null => operand.clone(),
    }
}
