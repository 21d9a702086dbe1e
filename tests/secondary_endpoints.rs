//! Secondary Endpoint Tests
//!
//! Tests for `/parents/{id}/relationship` composition:
//! - The plan is rooted at the parent, narrowed to the parent id
//! - Top-scope constraints apply to the secondary type
//! - The count filter is derived through the inverse relationship
//! - Relationship mutations compose minimal plans

mod common;

use jsonapi_compose::composer::{ComposeErrorCode, Composer, ComposerOptions, NoHooks, SecondaryEndpoint};
use jsonapi_compose::expressions::{FilterExpression, Literal, ScopedConstraint, SortElement, SortExpression};
use jsonapi_compose::resources::ViewableFieldCache;

use common::{blog_graph, composer, fields, filter, include, sort, PublishedOnly};

// =============================================================================
// Secondary resources
// =============================================================================

#[test]
fn test_to_many_secondary_resources() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();
    let constraints = vec![
        filter(None, FilterExpression::equals("text", "nice")),
        sort(None, SortExpression::new(vec![SortElement::desc("text")])),
        include(&["author"]),
    ];
    let mut composer = composer(&graph, &NoHooks, &viewable, &constraints);

    let secondary = composer
        .compose_secondary("articles", "comments", 1i64, SecondaryEndpoint::Resources)
        .unwrap();

    let plan = &secondary.plan;
    assert_eq!(plan.resource_type, "articles");
    assert_eq!(plan.filter, Some(FilterExpression::equals("id", 1i64)));
    assert!(plan.sort.is_none() && plan.pagination.is_none());
    assert_eq!(plan.selection.as_ref().unwrap().attributes().collect::<Vec<_>>(), vec!["id"]);

    let comments = plan.nested("comments").unwrap();
    assert_eq!(comments.filter, Some(FilterExpression::equals("text", "nice")));
    assert_eq!(comments.sort.as_ref().unwrap().to_string(), "-text");
    assert!(comments.pagination.is_some());
    assert_eq!(comments.nested("author").unwrap().resource_type, "people");

    assert_eq!(secondary.include.paths(), vec!["comments.author"]);
    assert_eq!(composer.evaluated_include_tree().paths(), vec!["author"]);
    assert!(composer.pagination_report().is_some());

    assert_eq!(
        secondary.secondary_filter.unwrap().to_string(),
        "and(equals(article.id,1),equals(text,'nice'))"
    );
}

#[test]
fn test_parent_hook_filter_is_rewritten_through_inverse() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();
    let mut composer = composer(&graph, &PublishedOnly, &viewable, &[]);

    let secondary = composer
        .compose_secondary("articles", "comments", 1i64, SecondaryEndpoint::Resources)
        .unwrap();

    assert_eq!(
        secondary.plan.filter.unwrap().to_string(),
        "and(equals(id,1),equals(status,'published'))"
    );
    assert_eq!(
        secondary.secondary_filter.unwrap().to_string(),
        "and(equals(article.id,1),equals(article.status,'published'))"
    );
}

#[test]
fn test_many_to_many_count_filter_uses_has() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();

    let plain = composer(&graph, &NoHooks, &viewable, &[])
        .secondary_filter("articles", "tags", 1i64)
        .unwrap();
    assert_eq!(plain.unwrap().to_string(), "has(articles,equals(id,1))");

    let published = composer(&graph, &PublishedOnly, &viewable, &[])
        .secondary_filter("articles", "tags", 1i64)
        .unwrap();
    assert_eq!(
        published.unwrap().to_string(),
        "has(articles,and(equals(id,1),equals(status,'published')))"
    );
}

#[test]
fn test_to_one_secondary() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();
    let mut composer = composer(&graph, &NoHooks, &viewable, &[]);

    let secondary = composer
        .compose_secondary("articles", "author", 1i64, SecondaryEndpoint::Resources)
        .unwrap();

    let author = secondary.plan.nested("author").unwrap();
    assert!(author.sort.is_none() && author.pagination.is_none());
    assert!(secondary.secondary_filter.is_none());
    assert!(composer.pagination_report().is_none());
}

#[test]
fn test_relationship_without_inverse_has_no_count_filter() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();
    let mut composer = composer(&graph, &NoHooks, &viewable, &[]);

    let secondary = composer
        .compose_secondary("people", "friends", 3i64, SecondaryEndpoint::Resources)
        .unwrap();
    assert!(secondary.plan.nested("friends").is_some());
    assert!(secondary.secondary_filter.is_none());
}

#[test]
fn test_relationship_identifiers_select_identity_only() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();
    let constraints = vec![include(&["author"]), fields("comments", &["text"])];
    let mut composer = composer(&graph, &NoHooks, &viewable, &constraints);

    let secondary = composer
        .compose_secondary("articles", "comments", 1i64, SecondaryEndpoint::RelationshipIdentifiers)
        .unwrap();

    let comments = secondary.plan.nested("comments").unwrap();
    let selection = comments.selection.as_ref().unwrap();
    assert_eq!(selection.attributes().collect::<Vec<_>>(), vec!["id"]);
    assert_eq!(selection.relationships().count(), 0);
    assert_eq!(secondary.include.paths(), vec!["comments"]);
}

#[test]
fn test_count_filter_disabled_by_options() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();
    let options = ComposerOptions {
        include_total_resource_count: false,
        ..ComposerOptions::default()
    };
    let constraints: Vec<ScopedConstraint> = Vec::new();
    let mut composer = Composer::new(&graph, &NoHooks, &viewable, options, &constraints);

    let secondary = composer
        .compose_secondary("articles", "comments", 1i64, SecondaryEndpoint::Resources)
        .unwrap();
    assert!(secondary.secondary_filter.is_none());
}

#[test]
fn test_unknown_secondary_relationship() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();

    let err = composer(&graph, &NoHooks, &viewable, &[])
        .compose_secondary("articles", "editors", 1i64, SecondaryEndpoint::Resources)
        .unwrap_err();
    assert_eq!(err.code(), ComposeErrorCode::InvalidRelationship);
    assert_eq!(err.resource_type(), Some("articles"));
}

// =============================================================================
// Relationship mutations
// =============================================================================

#[test]
fn test_right_ids_respect_target_hooks() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();
    let mut composer = composer(&graph, &PublishedOnly, &viewable, &[]);

    let node = composer
        .compose_for_relationship_right_ids("comments", "article", [Literal::from(5i64)])
        .unwrap();
    assert_eq!(node.resource_type, "articles");
    assert_eq!(
        node.filter.unwrap().to_string(),
        "and(equals(id,5),equals(status,'published'))"
    );

    let node = composer
        .compose_for_relationship_right_ids("articles", "tags", ["t1", "t2"].map(Literal::from))
        .unwrap();
    assert_eq!(node.filter.unwrap().to_string(), "any(id,'t1','t2')");
}

#[test]
fn test_update_preload_ignores_hooks() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();
    let mut composer = composer(&graph, &PublishedOnly, &viewable, &[]);

    let node = composer
        .compose_for_update_preload(1i64, "articles", &["tags"])
        .unwrap();
    assert_eq!(node.filter, Some(FilterExpression::equals("id", 1i64)));
    assert_eq!(node.nested("tags").unwrap().filter, None);
}

#[test]
fn test_has_many_requires_to_many() {
    let graph = blog_graph();
    let viewable = ViewableFieldCache::new();
    let mut composer = composer(&graph, &NoHooks, &viewable, &[]);

    let node = composer
        .compose_for_has_many("articles", "tags", 1i64, [Literal::from("t1")])
        .unwrap();
    assert_eq!(node.nested("tags").unwrap().filter, Some(FilterExpression::equals("id", "t1")));

    let err = composer
        .compose_for_has_many("comments", "article", 1i64, [Literal::from(2i64)])
        .unwrap_err();
    assert_eq!(err.code(), ComposeErrorCode::InvalidRelationship);
}
