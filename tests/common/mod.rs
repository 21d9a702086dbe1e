//! Shared fixture for integration tests
//!
//! A small blog graph:
//! - articles: title, body, status, internalNotes (view-blocked);
//!   author (to-one people), comments (to-many), tags (to-many, many-to-many)
//! - people: name; articles (inverse of author), friends (to-many, no inverse)
//! - comments: text; article (inverse of comments), author (to-one, no inverse)
//! - tags: name; articles (inverse of tags)

#![allow(dead_code)]

use jsonapi_compose::composer::{Composer, ComposerOptions, ResourceHooks};
use jsonapi_compose::expressions::{
    FilterExpression, IncludeExpression, QueryExpression, ScopedConstraint, SortExpression, SparseFieldSet,
    SparseFieldTable,
};
use jsonapi_compose::resources::{AttributeDef, InMemoryResourceGraph, RelationshipDef, ResourceType, ViewableFieldCache};

pub fn blog_graph() -> InMemoryResourceGraph {
    InMemoryResourceGraph::builder()
        .add(
            ResourceType::new("articles")
                .with_attributes(["title", "body", "status"])
                .with_attribute(AttributeDef::hidden("internalNotes"))
                .with_relationship(RelationshipDef::to_one("author", "people").with_inverse("articles"))
                .with_relationship(RelationshipDef::to_many("comments", "comments").with_inverse("article"))
                .with_relationship(RelationshipDef::to_many("tags", "tags").with_inverse("articles")),
        )
        .add(
            ResourceType::new("people")
                .with_attributes(["name"])
                .with_relationship(RelationshipDef::to_many("articles", "articles").with_inverse("author"))
                .with_relationship(RelationshipDef::to_many("friends", "people")),
        )
        .add(
            ResourceType::new("comments")
                .with_attributes(["text"])
                .with_relationship(RelationshipDef::to_one("article", "articles").with_inverse("comments"))
                .with_relationship(RelationshipDef::to_one("author", "people")),
        )
        .add(
            ResourceType::new("tags")
                .with_attributes(["name"])
                .with_relationship(RelationshipDef::to_many("articles", "articles").with_inverse("tags")),
        )
        .build()
        .unwrap()
}

/// Composer over the blog graph with default options
pub fn composer<'a, H: ResourceHooks>(
    graph: &'a InMemoryResourceGraph,
    hooks: &'a H,
    viewable: &'a ViewableFieldCache,
    constraints: &[ScopedConstraint],
) -> Composer<'a, InMemoryResourceGraph, H> {
    Composer::new(graph, hooks, viewable, ComposerOptions::default(), constraints)
}

pub fn filter(scope: Option<&str>, filter: FilterExpression) -> ScopedConstraint {
    constraint(scope, QueryExpression::Filter(filter))
}

pub fn sort(scope: Option<&str>, sort: SortExpression) -> ScopedConstraint {
    constraint(scope, QueryExpression::Sort(sort))
}

pub fn include(paths: &[&str]) -> ScopedConstraint {
    ScopedConstraint::top(QueryExpression::Include(IncludeExpression::from_paths(paths.iter().copied())))
}

pub fn fields(resource_type: &str, names: &[&str]) -> ScopedConstraint {
    ScopedConstraint::top(QueryExpression::SparseFieldTable(
        SparseFieldTable::new().with_set(resource_type, SparseFieldSet::new(names.iter().copied())),
    ))
}

fn constraint(scope: Option<&str>, expression: QueryExpression) -> ScopedConstraint {
    match scope {
        Some(scope) => ScopedConstraint::scoped(scope, expression),
        None => ScopedConstraint::top(expression),
    }
}

/// Restricts articles to published ones unless the request filters already
pub struct PublishedOnly;

impl ResourceHooks for PublishedOnly {
    fn apply_filter(&self, resource_type: &ResourceType, filter: Option<FilterExpression>) -> Option<FilterExpression> {
        if resource_type.name != "articles" {
            return filter;
        }
        FilterExpression::and_optional(filter, Some(FilterExpression::equals("status", "published")))
    }
}
