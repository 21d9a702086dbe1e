//! Join-less Backend Tests
//!
//! Tests for plans executed on a backend without joins:
//! - Filters may only reach attributes of the document and embedded relationships
//! - Includes may only be one level deep
//! - Rejections are bad requests with a client-facing title
//! - The relational backend accepts the same plans

use jsonapi_compose::composer::{
    ComposeErrorCode, Composer, ComposerOptions, ErrorCategory, NoHooks, SecondaryEndpoint, StorageBackend,
};
use jsonapi_compose::expressions::{FilterExpression, IncludeExpression, QueryExpression, ScopedConstraint};
use jsonapi_compose::plan::ExplainPlan;
use jsonapi_compose::resources::{InMemoryResourceGraph, RelationshipDef, ResourceGraphLoader, ResourceType, ViewableFieldCache};

// =============================================================================
// Helper Functions
// =============================================================================

fn shop_graph() -> InMemoryResourceGraph {
    InMemoryResourceGraph::builder()
        .add(
            ResourceType::new("orders")
                .with_attributes(["status", "total"])
                .with_relationship(RelationshipDef::to_many("lines", "orderLines").embedded())
                .with_relationship(RelationshipDef::to_one("customer", "customers").with_inverse("orders")),
        )
        .add(
            ResourceType::new("orderLines")
                .with_attributes(["sku", "quantity"])
                .with_relationship(RelationshipDef::to_one("product", "products")),
        )
        .add(ResourceType::new("products").with_attributes(["name"]))
        .add(
            ResourceType::new("customers")
                .with_attributes(["name"])
                .with_relationship(RelationshipDef::to_many("orders", "orders").with_inverse("customer")),
        )
        .build()
        .unwrap()
}

fn compose(backend: StorageBackend, constraints: Vec<ScopedConstraint>) -> Result<(), ComposeErrorCode> {
    let graph = shop_graph();
    let viewable = ViewableFieldCache::new();
    let options = ComposerOptions {
        backend,
        ..ComposerOptions::default()
    };

    Composer::new(&graph, &NoHooks, &viewable, options, &constraints)
        .compose("orders")
        .map(|_| ())
        .map_err(|e| e.code())
}

fn filter(filter: FilterExpression) -> ScopedConstraint {
    ScopedConstraint::top(QueryExpression::Filter(filter))
}

fn include(paths: &[&str]) -> ScopedConstraint {
    ScopedConstraint::top(QueryExpression::Include(IncludeExpression::from_paths(paths.iter().copied())))
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_attribute_filters_accepted() {
    let constraints = vec![filter(FilterExpression::equals("status", "open"))];
    assert_eq!(compose(StorageBackend::Joinless, constraints), Ok(()));
}

#[test]
fn test_embedded_relationship_filters_accepted() {
    let constraints = vec![filter(FilterExpression::has(
        "lines",
        Some(FilterExpression::equals("sku", "A-1")),
    ))];
    assert_eq!(compose(StorageBackend::Joinless, constraints), Ok(()));
}

#[test]
fn test_join_filter_rejected() {
    let constraints = vec![filter(FilterExpression::equals("customer.name", "Ann"))];
    assert_eq!(
        compose(StorageBackend::Joinless, constraints.clone()),
        Err(ComposeErrorCode::UnsupportedFilter)
    );
    assert_eq!(compose(StorageBackend::Relational, constraints), Ok(()));
}

#[test]
fn test_join_inside_embedded_filter_rejected() {
    let constraints = vec![filter(FilterExpression::has(
        "lines",
        Some(FilterExpression::equals("product.name", "Widget")),
    ))];
    assert_eq!(
        compose(StorageBackend::Joinless, constraints),
        Err(ComposeErrorCode::UnsupportedFilter)
    );
}

#[test]
fn test_nested_node_filters_validated() {
    let constraints = vec![
        include(&["lines"]),
        ScopedConstraint::scoped(
            "lines",
            QueryExpression::Filter(FilterExpression::equals("product.name", "Widget")),
        ),
    ];
    assert_eq!(
        compose(StorageBackend::Joinless, constraints),
        Err(ComposeErrorCode::UnsupportedFilter)
    );
}

#[test]
fn test_rejection_is_bad_request() {
    let graph = shop_graph();
    let viewable = ViewableFieldCache::new();
    let constraints = vec![filter(FilterExpression::equals("customer.name", "Ann"))];

    let err = Composer::new(&graph, &NoHooks, &viewable, ComposerOptions::joinless(), &constraints)
        .compose("orders")
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::BadRequest);
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.title(), "Unsupported filter expression.");
    assert!(err.detail().contains("customer.name"));

    let explain = ExplainPlan::from_error(&err).to_string();
    assert!(explain.contains("Status: REJECTED"));
    assert!(explain.contains("COMPOSE_UNSUPPORTED_FILTER"));
}

// =============================================================================
// Includes
// =============================================================================

#[test]
fn test_single_level_include_accepted() {
    let constraints = vec![include(&["customer", "lines"])];
    assert_eq!(compose(StorageBackend::Joinless, constraints), Ok(()));
}

#[test]
fn test_nested_include_rejected() {
    let constraints = vec![include(&["lines.product"])];
    assert_eq!(
        compose(StorageBackend::Joinless, constraints.clone()),
        Err(ComposeErrorCode::UnsupportedInclude)
    );
    assert_eq!(compose(StorageBackend::Relational, constraints), Ok(()));
}

#[test]
fn test_rejected_compose_leaves_no_pagination_report() {
    let graph = shop_graph();
    let viewable = ViewableFieldCache::new();

    let accepted = vec![include(&["customer"])];
    let mut composer = Composer::new(&graph, &NoHooks, &viewable, ComposerOptions::joinless(), &accepted);
    composer.compose("orders").unwrap();
    assert!(composer.pagination_report().is_some());

    let rejected = vec![include(&["customer.orders"])];
    let mut composer = Composer::new(&graph, &NoHooks, &viewable, ComposerOptions::joinless(), &rejected);
    let err = composer.compose("orders").unwrap_err();
    assert_eq!(err.code(), ComposeErrorCode::UnsupportedInclude);
    assert!(composer.pagination_report().is_none());

    let err = composer
        .compose_secondary("customers", "orders", 4i64, SecondaryEndpoint::Resources)
        .unwrap_err();
    assert_eq!(err.code(), ComposeErrorCode::UnsupportedInclude);
    assert!(composer.pagination_report().is_none());
}

#[test]
fn test_secondary_endpoint_on_joinless_backend() {
    let graph = shop_graph();
    let viewable = ViewableFieldCache::new();
    let constraints = vec![
        filter(FilterExpression::equals("status", "open")),
        include(&["lines"]),
    ];
    let mut composer = Composer::new(&graph, &NoHooks, &viewable, ComposerOptions::joinless(), &constraints);

    let secondary = composer
        .compose_secondary("customers", "orders", 4i64, SecondaryEndpoint::Resources)
        .unwrap();
    assert_eq!(secondary.include.paths(), vec!["orders.lines"]);
    assert_eq!(
        secondary.secondary_filter.unwrap().to_string(),
        "and(equals(customer.id,4),equals(status,'open'))"
    );

    let constraints = vec![include(&["lines.product"])];
    let err = Composer::new(&graph, &NoHooks, &viewable, ComposerOptions::joinless(), &constraints)
        .compose_secondary("customers", "orders", 4i64, SecondaryEndpoint::Resources)
        .unwrap_err();
    assert_eq!(err.code(), ComposeErrorCode::UnsupportedInclude);
}

#[test]
fn test_backend_from_options_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("options.json");
    std::fs::write(&path, r#"{"backend": "joinless", "defaultPageSize": "unbounded"}"#).unwrap();

    let options = ComposerOptions::load(&path).unwrap();
    assert!(options.is_joinless());

    let graph = ResourceGraphLoader::from_json_str(
        r#"[{"name": "notes", "attributes": [{"name": "id"}, {"name": "text"}]}]"#,
    )
    .unwrap();
    let viewable = ViewableFieldCache::new();
    let constraints: Vec<ScopedConstraint> = Vec::new();
    let node = Composer::new(&graph, &NoHooks, &viewable, options, &constraints)
        .compose("notes")
        .unwrap();
    assert_eq!(node.pagination.unwrap().to_string(), "page[number]=1,page[size]=unbounded");
}
