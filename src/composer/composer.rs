//! Top-level composition
//!
//! One `Composer` serves one request. It enumerates the request's constraints
//! once, resolves filter/sort/page/fields per resource type, expands the
//! include tree into nested plan nodes and records the resolved include tree
//! and page window for the response side.

use std::collections::BTreeSet;

use tracing::debug;

use crate::expressions::{
    ConstraintSource, FieldChain, FilterExpression, IncludeExpression, Literal, Operand, QueryExpression,
    ScopedConstraint, SortExpression, SortTarget, SparseFieldSet,
};
use crate::observability::ComposeEvent;
use crate::plan::{FieldSelection, QueryPlanNode};
use crate::resources::{FieldRef, ResourceGraph, ResourceType, ViewableFieldCache};

use super::errors::{ComposeError, ComposeResult};
use super::hooks::{NoHooks, ResourceHooks};
use super::include_cache::EvaluatedIncludeCache;
use super::joinless::JoinlessValidator;
use super::options::ComposerOptions;
use super::pagination::{resolve_pagination, resolve_sort, PaginationReport};
use super::sparse_fields::SparseFieldSetCache;

/// How `compose_by_id` treats the composed field selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopFieldSelection {
    /// Keep the selection as composed
    PreserveExisting,
    /// Select all attributes, dropping sparse field set exclusions
    AllAttributes,
    /// Select only the identity field, dropping included relationships
    OnlyIdentity,
}

/// Builds plan trees for one request
pub struct Composer<'a, G, H = NoHooks>
where
    G: ResourceGraph + ?Sized,
    H: ResourceHooks + ?Sized,
{
    pub(super) graph: &'a G,
    pub(super) hooks: &'a H,
    pub(super) options: ComposerOptions,
    viewable_fields: &'a ViewableFieldCache,
    pub(super) constraints: Vec<ScopedConstraint>,
    pub(super) sparse_fields: SparseFieldSetCache,
    pub(super) pagination_report: Option<PaginationReport>,
    pub(super) evaluated_includes: EvaluatedIncludeCache,
    consumed_scopes: BTreeSet<Option<FieldChain>>,
}

impl<'a, G, H> Composer<'a, G, H>
where
    G: ResourceGraph + ?Sized,
    H: ResourceHooks + ?Sized,
{
    /// Creates a composer over the constraints `source` supplies.
    /// The source is enumerated once, here.
    pub fn new<S: ConstraintSource + ?Sized>(
        graph: &'a G,
        hooks: &'a H,
        viewable_fields: &'a ViewableFieldCache,
        options: ComposerOptions,
        source: &S,
    ) -> Self {
        let constraints = source.constraints();
        let sparse_fields = SparseFieldSetCache::new(&constraints);

        Self {
            graph,
            hooks,
            options,
            viewable_fields,
            constraints,
            sparse_fields,
            pagination_report: None,
            evaluated_includes: EvaluatedIncludeCache::new(),
            consumed_scopes: BTreeSet::new(),
        }
    }

    pub fn options(&self) -> &ComposerOptions {
        &self.options
    }

    pub fn constraints(&self) -> &[ScopedConstraint] {
        &self.constraints
    }

    /// Composes the full plan for a request on `primary_type`.
    pub fn compose(&mut self, primary_type: &str) -> ComposeResult<QueryPlanNode> {
        let resource_type = self.require_type(primary_type)?;
        debug!(
            event = %ComposeEvent::ComposeStart,
            operation = "compose",
            resource_type = %resource_type.name,
            constraints = self.constraints.len(),
            "composing plan"
        );
        self.begin();

        let mut node = self.compose_node(resource_type, None, true)?;
        let pagination_report = node.pagination.as_ref().map(PaginationReport::begin);

        let include = self.top_include();
        let elements = self.expand_includes(include.into_elements(), resource_type, &mut node, None)?;
        let include = IncludeExpression::new(elements);

        if self.options.is_joinless() {
            let validator = JoinlessValidator::new(self.graph);
            validator.validate_include(resource_type, &include)?;
            validator.validate_plan(&node)?;
        }

        self.pagination_report = pagination_report;
        self.finish(&node, include);
        Ok(node)
    }

    /// Composes the plan for a single identified resource.
    ///
    /// Sort and page window are dropped, the filter is narrowed to `id`
    /// (combined with whatever the request and hooks filter on) and the field
    /// selection is adjusted per `field_mode`.
    pub fn compose_by_id(
        &mut self,
        id: impl Into<Literal>,
        primary_type: &str,
        field_mode: TopFieldSelection,
    ) -> ComposeResult<QueryPlanNode> {
        let resource_type = self.require_type(primary_type)?;
        let mut node = self.compose(primary_type)?;

        node.sort = None;
        node.pagination = None;
        node.filter = filter_by_ids(resource_type.identity(), [id.into()], node.filter.take());

        match field_mode {
            TopFieldSelection::PreserveExisting => {}
            TopFieldSelection::AllAttributes => {
                if let Some(selection) = node.selection.as_mut() {
                    selection.remove_attributes();
                }
                node.normalize_selection();
            }
            TopFieldSelection::OnlyIdentity => {
                node.selection = Some(FieldSelection::of_attributes([resource_type.identity()]));
            }
        }

        Ok(node)
    }

    /// Composes the plan that loads a resource before it is updated: the
    /// resource by id, with every relationship the update targets included.
    /// No hooks, sort or page window apply.
    pub fn compose_for_update_preload(
        &mut self,
        id: impl Into<Literal>,
        primary_type: &str,
        targeted_relationships: &[&str],
    ) -> ComposeResult<QueryPlanNode> {
        let graph = self.graph;
        let resource_type = self.require_type(primary_type)?;
        debug!(
            event = %ComposeEvent::ComposeStart,
            operation = "update_preload",
            resource_type = %resource_type.name,
            "composing plan"
        );

        let mut node = QueryPlanNode::new(&resource_type.name).with_filter(filter_by_ids(
            resource_type.identity(),
            [id.into()],
            None,
        ));

        for name in targeted_relationships {
            let relationship = resource_type.relationship(name).ok_or_else(|| {
                ComposeError::invalid_relationship(&resource_type.name, name, "is not a relationship")
            })?;
            let target = graph.require_type(&relationship.target)?;
            node.selection_mut()
                .include_relationship(&relationship.name, QueryPlanNode::new(&target.name));
        }

        debug!(
            event = %ComposeEvent::ComposeComplete,
            operation = "update_preload",
            resource_type = %resource_type.name,
            nodes = node.node_count(),
            "plan composed"
        );
        Ok(node)
    }

    /// Composes the plan that fetches the right-hand side resources of a
    /// relationship mutation, to verify they exist.
    pub fn compose_for_relationship_right_ids(
        &mut self,
        primary_type: &str,
        relationship: &str,
        right_ids: impl IntoIterator<Item = Literal>,
    ) -> ComposeResult<QueryPlanNode> {
        let graph = self.graph;
        let left_type = self.require_type(primary_type)?;
        let relationship = left_type.relationship(relationship).ok_or_else(|| {
            ComposeError::invalid_relationship(&left_type.name, relationship, "is not a relationship")
        })?;
        let right_type = graph.require_type(&relationship.target)?;

        let base_filter = self.hooks.apply_filter(right_type, None);
        if let Some(filter) = &base_filter {
            check_filter(graph, right_type, filter)?;
        }

        let field_set = self.sparse_fields.for_relationship(self.hooks, right_type)?;
        Ok(QueryPlanNode::new(&right_type.name)
            .with_filter(filter_by_ids(right_type.identity(), right_ids, base_filter))
            .with_selection(Some(attribute_selection(right_type, &field_set))))
    }

    /// Composes the plan that loads a resource by id together with the given
    /// members of one of its to-many relationships, both by identity only.
    pub fn compose_for_has_many(
        &mut self,
        primary_type: &str,
        relationship: &str,
        left_id: impl Into<Literal>,
        right_ids: impl IntoIterator<Item = Literal>,
    ) -> ComposeResult<QueryPlanNode> {
        let graph = self.graph;
        let left_type = self.require_type(primary_type)?;
        let relationship = left_type
            .relationship(relationship)
            .filter(|relationship| relationship.is_to_many())
            .ok_or_else(|| {
                ComposeError::invalid_relationship(&left_type.name, relationship, "is not a to-many relationship")
            })?;
        let right_type = graph.require_type(&relationship.target)?;

        let right_node = QueryPlanNode::new(&right_type.name)
            .with_filter(filter_by_ids(right_type.identity(), right_ids, None))
            .with_selection(Some(FieldSelection::of_attributes([right_type.identity()])));

        let mut selection = FieldSelection::of_attributes([left_type.identity()]);
        selection.include_relationship(&relationship.name, right_node);

        Ok(QueryPlanNode::new(&left_type.name)
            .with_filter(filter_by_ids(left_type.identity(), [left_id.into()], None))
            .with_selection(Some(selection)))
    }

    /// The include tree the last composition resolved. Without a prior
    /// composition, the request's top-level include is used and frozen.
    pub fn evaluated_include_tree(&self) -> &IncludeExpression {
        self.evaluated_includes.get_or_init(|| self.top_include())
    }

    /// Page window of the last composition, if any
    pub fn pagination_report(&self) -> Option<&PaginationReport> {
        self.pagination_report.as_ref()
    }

    /// Mutable access for the response side (page fullness, total count)
    pub fn pagination_report_mut(&mut self) -> Option<&mut PaginationReport> {
        self.pagination_report.as_mut()
    }

    /// Fields the serializer may render for `type_name`
    pub fn sparse_field_set_for_serializer(&mut self, type_name: &str) -> ComposeResult<SparseFieldSet> {
        let resource_type = self.require_type(type_name)?;
        self.sparse_fields
            .for_serializer(self.hooks, resource_type, self.viewable_fields)
    }

    // ==================
    // Shared building blocks
    // ==================

    pub(super) fn require_type(&self, name: &str) -> ComposeResult<&'a ResourceType> {
        let graph = self.graph;
        graph
            .resource_type(name)
            .ok_or_else(|| ComposeError::unknown_resource_type(name))
    }

    /// Resets per-composition state
    pub(super) fn begin(&mut self) {
        self.sparse_fields.reset();
        self.consumed_scopes.clear();
        self.pagination_report = None;
    }

    /// Records the resolved include tree and reports unused constraints
    pub(super) fn finish(&mut self, node: &QueryPlanNode, include: IncludeExpression) {
        let include_text = include.to_string();
        if !self.evaluated_includes.set(include) {
            debug!(
                resource_type = %node.resource_type,
                "evaluated include tree already recorded, keeping the first"
            );
        }

        for constraint in &self.constraints {
            if matches!(constraint.expression, QueryExpression::SparseFieldTable(_)) {
                continue;
            }
            if !self.consumed_scopes.contains(&constraint.scope) {
                debug!(
                    event = %ComposeEvent::ConstraintUnused,
                    scope = %constraint.scope.as_ref().map(ToString::to_string).unwrap_or_default(),
                    "constraint scoped to a relationship that is not included"
                );
            }
        }

        debug!(
            event = %ComposeEvent::ComposeComplete,
            resource_type = %node.resource_type,
            nodes = node.node_count(),
            include = %include_text,
            "plan composed"
        );
    }

    /// The first top-scope include, or an empty one
    pub(super) fn top_include(&self) -> IncludeExpression {
        self.constraints
            .iter()
            .filter(|constraint| constraint.applies_to(None))
            .find_map(|constraint| constraint.expression.as_include())
            .cloned()
            .unwrap_or_default()
    }

    pub(super) fn expressions_in_scope(&self, scope: Option<&FieldChain>) -> Vec<QueryExpression> {
        self.constraints
            .iter()
            .filter(|constraint| constraint.applies_to(scope))
            .map(|constraint| constraint.expression.clone())
            .collect()
    }

    /// Builds the node for one resource type at `scope`.
    ///
    /// Filter, sort and page window are only resolved for collections; a
    /// to-one target has no meaningful window.
    pub(super) fn compose_node(
        &mut self,
        resource_type: &'a ResourceType,
        scope: Option<&FieldChain>,
        collection: bool,
    ) -> ComposeResult<QueryPlanNode> {
        self.consumed_scopes.insert(scope.cloned());

        let expressions = self.expressions_in_scope(scope);
        let expressions: Vec<&QueryExpression> = expressions.iter().collect();
        let mut node = QueryPlanNode::new(&resource_type.name);

        if collection {
            node.filter = self
                .resolve_filter(resource_type, &expressions)
                .map_err(|e| e.with_scope(scope))?;

            let sort = resolve_sort(self.hooks, resource_type, &expressions);
            check_sort(self.graph, resource_type, &sort).map_err(|e| e.with_scope(scope))?;
            node.sort = Some(sort);

            node.pagination = Some(resolve_pagination(
                self.hooks,
                resource_type,
                &expressions,
                self.options.default_page_size,
            ));
        }

        node.selection = self
            .selection_for_query(resource_type)
            .map_err(|e| e.with_scope(scope))?;
        Ok(node)
    }

    /// AND of all filter expressions, passed through the type's hook
    pub(super) fn resolve_filter(
        &self,
        resource_type: &ResourceType,
        expressions: &[&QueryExpression],
    ) -> ComposeResult<Option<FilterExpression>> {
        let requested = FilterExpression::and_all(
            expressions
                .iter()
                .filter_map(|expression| expression.as_filter())
                .cloned(),
        );

        let filter = self.hooks.apply_filter(resource_type, requested);
        if let Some(filter) = &filter {
            check_filter(self.graph, resource_type, filter)?;
        }
        Ok(filter)
    }

    /// Field selection from the for-query sparse field set: identity plus the
    /// requested attributes, or `None` when unrestricted
    pub(super) fn selection_for_query(&mut self, resource_type: &ResourceType) -> ComposeResult<Option<FieldSelection>> {
        let field_set = self.sparse_fields.for_query(self.hooks, resource_type)?;
        Ok(field_set.map(|set| attribute_selection(resource_type, &set)))
    }
}

/// Identity plus the attributes named in `field_set`
pub(super) fn attribute_selection(resource_type: &ResourceType, field_set: &SparseFieldSet) -> FieldSelection {
    let mut selection = FieldSelection::of_attributes([resource_type.identity()]);
    for field in field_set.fields() {
        if resource_type.attribute(field).is_some() {
            selection.include_attribute(field.as_str());
        }
    }
    selection
}

/// Narrows `existing` to the given ids: `equals` for one id, `any` for
/// several, ANDed in front of the existing filter. No ids leave `existing`
/// unchanged.
pub fn filter_by_ids(
    identity: &str,
    ids: impl IntoIterator<Item = Literal>,
    existing: Option<FilterExpression>,
) -> Option<FilterExpression> {
    let mut ids: Vec<Literal> = ids.into_iter().collect();
    let by_id = match ids.len() {
        0 => None,
        1 => ids.pop().map(|id| FilterExpression::equals(identity, id)),
        _ => Some(FilterExpression::any_of(identity, ids)),
    };
    FilterExpression::and_optional(by_id, existing)
}

// ==================
// Metadata checks
// ==================

/// Verifies every chain in `filter` against the resource graph
pub(super) fn check_filter<G: ResourceGraph + ?Sized>(
    graph: &G,
    resource_type: &ResourceType,
    filter: &FilterExpression,
) -> ComposeResult<()> {
    match filter {
        FilterExpression::Comparison { left, right, .. } => {
            check_operand(graph, resource_type, left)?;
            check_operand(graph, resource_type, right)
        }
        FilterExpression::Logical { terms, .. } => terms
            .iter()
            .try_for_each(|term| check_filter(graph, resource_type, term)),
        FilterExpression::Not { filter } => check_filter(graph, resource_type, filter),
        FilterExpression::AnyOf { target, .. } | FilterExpression::MatchText { target, .. } => {
            graph.resolve_chain(resource_type, target)?;
            Ok(())
        }
        FilterExpression::Has { target, filter } => {
            let related = to_many_target(graph, resource_type, target)?;
            match filter {
                Some(inner) => check_filter(graph, related, inner),
                None => Ok(()),
            }
        }
        FilterExpression::IsType {
            target,
            derived_type,
            filter,
        } => {
            if let Some(target) = target {
                let resolved = graph.resolve_chain(resource_type, target)?;
                if resolved.last_relationship().map_or(true, |r| r.is_to_many()) {
                    return Err(ComposeError::invalid_relationship(
                        &resource_type.name,
                        &target.to_string(),
                        "isType() requires a to-one relationship",
                    ));
                }
            }
            let derived = graph.require_type(derived_type)?;
            match filter {
                Some(inner) => check_filter(graph, derived, inner),
                None => Ok(()),
            }
        }
    }
}

fn check_operand<G: ResourceGraph + ?Sized>(
    graph: &G,
    resource_type: &ResourceType,
    operand: &Operand,
) -> ComposeResult<()> {
    match operand {
        Operand::Field(chain) => {
            graph.resolve_chain(resource_type, chain)?;
            Ok(())
        }
        Operand::Count(chain) => to_many_target(graph, resource_type, chain).map(|_| ()),
        Operand::Literal(_) | Operand::Null => Ok(()),
    }
}

fn check_sort<G: ResourceGraph + ?Sized>(
    graph: &G,
    resource_type: &ResourceType,
    sort: &SortExpression,
) -> ComposeResult<()> {
    for element in sort.elements() {
        match &element.target {
            SortTarget::Field(chain) => {
                let resolved = graph.resolve_chain(resource_type, chain)?;
                if !matches!(resolved.last(), Some(FieldRef::Attribute(_))) {
                    return Err(ComposeError::unknown_field(&resource_type.name, &chain.to_string()));
                }
            }
            SortTarget::Count(chain) => {
                to_many_target(graph, resource_type, chain)?;
            }
        }
    }
    Ok(())
}

/// Resolves a chain that must end in a to-many relationship
fn to_many_target<'g, G: ResourceGraph + ?Sized>(
    graph: &'g G,
    resource_type: &'g ResourceType,
    chain: &FieldChain,
) -> ComposeResult<&'g ResourceType> {
    let resolved = graph.resolve_chain(resource_type, chain)?;
    match resolved.last_relationship() {
        Some(relationship) if relationship.is_to_many() => Ok(resolved.target),
        _ => Err(ComposeError::invalid_relationship(
            &resource_type.name,
            &chain.to_string(),
            "expected a to-many relationship",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::{PageSize, PaginationExpression, SortElement, SparseFieldTable};
    use crate::resources::{InMemoryResourceGraph, RelationshipDef};

    fn graph() -> InMemoryResourceGraph {
        InMemoryResourceGraph::builder()
            .add(
                ResourceType::new("articles")
                    .with_attributes(["title", "body"])
                    .with_relationship(RelationshipDef::to_one("author", "people").with_inverse("articles"))
                    .with_relationship(RelationshipDef::to_many("comments", "comments").with_inverse("article")),
            )
            .add(
                ResourceType::new("people")
                    .with_attributes(["name"])
                    .with_relationship(RelationshipDef::to_many("articles", "articles").with_inverse("author")),
            )
            .add(
                ResourceType::new("comments")
                    .with_attributes(["text"])
                    .with_relationship(RelationshipDef::to_one("article", "articles").with_inverse("comments")),
            )
            .build()
            .unwrap()
    }

    fn compose(constraints: Vec<ScopedConstraint>) -> ComposeResult<QueryPlanNode> {
        let graph = graph();
        let viewable = ViewableFieldCache::new();
        let mut composer = Composer::new(&graph, &NoHooks, &viewable, ComposerOptions::default(), &constraints);
        composer.compose("articles")
    }

    #[test]
    fn test_unconstrained_defaults() {
        let node = compose(Vec::new()).unwrap();

        assert_eq!(node.resource_type, "articles");
        assert_eq!(node.filter, None);
        assert_eq!(node.sort, Some(SortExpression::ascending_by("id")));
        assert_eq!(
            node.pagination,
            Some(PaginationExpression::first_page(PageSize::bounded(10).unwrap()))
        );
        assert_eq!(node.selection, None);
    }

    #[test]
    fn test_top_scope_sort_used() {
        let node = compose(vec![ScopedConstraint::top(QueryExpression::Sort(SortExpression::new(vec![
            SortElement::asc("title"),
        ])))])
        .unwrap();

        assert_eq!(node.sort, Some(SortExpression::ascending_by("title")));
    }

    #[test]
    fn test_filters_are_anded() {
        let node = compose(vec![
            ScopedConstraint::top(QueryExpression::Filter(FilterExpression::equals("title", "a"))),
            ScopedConstraint::top(QueryExpression::Filter(FilterExpression::equals("body", "b"))),
        ])
        .unwrap();

        assert_eq!(
            node.filter.unwrap().to_string(),
            "and(equals(title,'a'),equals(body,'b'))"
        );
    }

    #[test]
    fn test_unknown_filter_field_fails() {
        let err = compose(vec![ScopedConstraint::top(QueryExpression::Filter(
            FilterExpression::equals("author.age", 3i64),
        ))])
        .unwrap_err();
        assert_eq!(err.code().code(), "COMPOSE_UNKNOWN_FIELD");
        assert_eq!(err.resource_type(), Some("people"));
    }

    #[test]
    fn test_sparse_fields_keep_identity() {
        let node = compose(vec![ScopedConstraint::top(QueryExpression::SparseFieldTable(
            SparseFieldTable::new().with_set("articles", SparseFieldSet::new(["title"])),
        ))])
        .unwrap();

        let selection = node.selection.unwrap();
        let attributes: Vec<&str> = selection.attributes().collect();
        assert_eq!(attributes, vec!["id", "title"]);
    }

    #[test]
    fn test_filter_by_ids() {
        let existing = FilterExpression::equals("title", "x");

        assert_eq!(filter_by_ids("id", [], Some(existing.clone())), Some(existing.clone()));
        assert_eq!(filter_by_ids("id", [], None), None);
        assert_eq!(
            filter_by_ids("id", [Literal::from(7i64)], None),
            Some(FilterExpression::equals("id", 7i64))
        );
        assert_eq!(
            filter_by_ids("id", [Literal::from(1i64), Literal::from(2i64)], Some(existing))
                .unwrap()
                .to_string(),
            "and(any(id,1,2),equals(title,'x'))"
        );
    }

    #[test]
    fn test_compose_for_has_many() {
        let graph = graph();
        let viewable = ViewableFieldCache::new();
        let constraints: Vec<ScopedConstraint> = Vec::new();
        let mut composer = Composer::new(&graph, &NoHooks, &viewable, ComposerOptions::default(), &constraints);

        let node = composer
            .compose_for_has_many("articles", "comments", 1i64, [Literal::from(5i64), Literal::from(6i64)])
            .unwrap();

        assert_eq!(node.filter, Some(FilterExpression::equals("id", 1i64)));
        let comments = node.nested("comments").unwrap();
        assert_eq!(comments.filter.as_ref().unwrap().to_string(), "any(id,5,6)");
        assert_eq!(comments.selection.as_ref().unwrap().attributes().collect::<Vec<_>>(), vec!["id"]);

        let err = composer
            .compose_for_has_many("articles", "author", 1i64, [Literal::from(5i64)])
            .unwrap_err();
        assert_eq!(err.code().code(), "COMPOSE_INVALID_RELATIONSHIP");
    }

    #[test]
    fn test_compose_for_relationship_right_ids() {
        let graph = graph();
        let viewable = ViewableFieldCache::new();
        let constraints: Vec<ScopedConstraint> = Vec::new();
        let mut composer = Composer::new(&graph, &NoHooks, &viewable, ComposerOptions::default(), &constraints);

        let node = composer
            .compose_for_relationship_right_ids("articles", "author", [Literal::from(3i64)])
            .unwrap();

        assert_eq!(node.resource_type, "people");
        assert_eq!(node.filter, Some(FilterExpression::equals("id", 3i64)));
        assert!(node.sort.is_none());
        assert_eq!(node.selection.unwrap().attributes().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_compose_for_update_preload() {
        let graph = graph();
        let viewable = ViewableFieldCache::new();
        let constraints = vec![ScopedConstraint::top(QueryExpression::Filter(FilterExpression::equals(
            "title", "ignored",
        )))];
        let mut composer = Composer::new(&graph, &NoHooks, &viewable, ComposerOptions::default(), &constraints);

        let node = composer
            .compose_for_update_preload(9i64, "articles", &["author", "comments"])
            .unwrap();

        assert_eq!(node.filter, Some(FilterExpression::equals("id", 9i64)));
        assert!(node.sort.is_none() && node.pagination.is_none());
        let selection = node.selection.as_ref().unwrap();
        assert!(selection.contains_only_relationships());
        assert_eq!(node.nested("comments").unwrap(), &QueryPlanNode::new("comments"));

        let err = composer
            .compose_for_update_preload(9i64, "articles", &["title"])
            .unwrap_err();
        assert_eq!(err.code().code(), "COMPOSE_INVALID_RELATIONSHIP");
    }
}
