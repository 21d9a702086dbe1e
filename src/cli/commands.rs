//! CLI command implementations
//!
//! `explain` loads a resource graph and a constraint set, composes the plan
//! the request would run and prints it. Composition errors are reported as an
//! explain of the rejection and then returned, so the exit code is non-zero.

use std::path::PathBuf;

use tracing::debug;

use crate::composer::{
    Composer, ComposeResult, ComposerOptions, NoHooks, SecondaryEndpoint, TopFieldSelection,
};
use crate::expressions::{IncludeExpression, Literal, ScopedConstraint};
use crate::observability::init_logging;
use crate::plan::{ExplainPlan, QueryPlanNode};
use crate::resources::{InMemoryResourceGraph, ResourceGraphLoader, ViewableFieldCache};

use super::args::Command;
use super::errors::CliResult;
use super::io::{read_constraints, write_json, write_text};

/// Parsed `explain` invocation
#[derive(Debug, Clone)]
pub struct ExplainRequest {
    pub graph_dir: PathBuf,
    pub constraints: PathBuf,
    pub resource_type: String,
    pub options: Option<PathBuf>,
    pub id: Option<String>,
    pub relationship: Option<String>,
    pub json: bool,
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Explain {
            graph,
            constraints,
            resource_type,
            options,
            id,
            relationship,
            verbose,
            json,
        } => {
            init_logging(if verbose { "jsonapi_compose=debug" } else { "warn" });
            explain(&ExplainRequest {
                graph_dir: graph,
                constraints,
                resource_type,
                options,
                id,
                relationship,
                json,
            })
        }
    }
}

/// Compose a request and print its explain plan
pub fn explain(request: &ExplainRequest) -> CliResult<()> {
    let graph = ResourceGraphLoader::new(&request.graph_dir).load()?;
    let constraints = read_constraints(&request.constraints)?;
    let options = match &request.options {
        Some(path) => ComposerOptions::load(path)?,
        None => ComposerOptions::default(),
    };
    debug!(
        constraints = constraints.len(),
        backend = ?options.backend,
        "explain request loaded"
    );

    let result = explain_plan(&graph, &constraints, options, request);
    let explain = match &result {
        Ok((plan, include)) => ExplainPlan::from_plan(plan, include),
        Err(err) => ExplainPlan::from_error(err),
    };

    if request.json {
        write_json(&explain)?;
    } else {
        write_text(&explain.to_string())?;
    }

    result.map(|_| ()).map_err(Into::into)
}

fn explain_plan(
    graph: &InMemoryResourceGraph,
    constraints: &[ScopedConstraint],
    options: ComposerOptions,
    request: &ExplainRequest,
) -> ComposeResult<(QueryPlanNode, IncludeExpression)> {
    let viewable = ViewableFieldCache::new();
    let mut composer = Composer::new(graph, &NoHooks, &viewable, options, constraints);

    match (&request.id, &request.relationship) {
        (Some(id), Some(relationship)) => {
            let secondary = composer.compose_secondary(
                &request.resource_type,
                relationship,
                parse_id(id),
                SecondaryEndpoint::Resources,
            )?;
            Ok((secondary.plan, secondary.include))
        }
        (Some(id), None) => {
            let plan = composer.compose_by_id(parse_id(id), &request.resource_type, TopFieldSelection::PreserveExisting)?;
            Ok((plan, composer.evaluated_include_tree().clone()))
        }
        (None, _) => {
            let plan = composer.compose(&request.resource_type)?;
            Ok((plan, composer.evaluated_include_tree().clone()))
        }
    }
}

/// Numeric ids are passed as numbers, anything else as a string
fn parse_id(id: &str) -> Literal {
    match id.parse::<i64>() {
        Ok(number) => Literal::from(number),
        Err(_) => Literal::from(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir) -> ExplainRequest {
        let defs = dir.path().join("defs");
        fs::create_dir(&defs).unwrap();
        fs::write(
            defs.join("articles.json"),
            r#"{"name": "articles", "attributes": [{"name": "id"}, {"name": "title"}],
                "relationships": [{"name": "author", "kind": "toOne", "target": "people"}]}"#,
        )
        .unwrap();
        fs::write(
            defs.join("people.json"),
            r#"{"name": "people", "attributes": [{"name": "id"}, {"name": "name"}]}"#,
        )
        .unwrap();

        let constraints = dir.path().join("query.json");
        fs::write(
            &constraints,
            r#"[{"expression": {"kind": "include", "value": ["author"]}}]"#,
        )
        .unwrap();

        ExplainRequest {
            graph_dir: defs,
            constraints,
            resource_type: "articles".into(),
            options: None,
            id: None,
            relationship: None,
            json: false,
        }
    }

    #[test]
    fn test_explain_plan_from_files() {
        let dir = TempDir::new().unwrap();
        let request = write_fixture(&dir);
        let graph = ResourceGraphLoader::new(&request.graph_dir).load().unwrap();
        let constraints = read_constraints(&request.constraints).unwrap();

        let (plan, include) = explain_plan(&graph, &constraints, ComposerOptions::default(), &request).unwrap();
        assert!(plan.nested("author").is_some());
        assert_eq!(include.paths(), vec!["author"]);
    }

    #[test]
    fn test_explain_by_id() {
        let dir = TempDir::new().unwrap();
        let request = ExplainRequest {
            id: Some("7".into()),
            ..write_fixture(&dir)
        };
        let graph = ResourceGraphLoader::new(&request.graph_dir).load().unwrap();

        let (plan, _) = explain_plan(&graph, &[], ComposerOptions::default(), &request).unwrap();
        assert_eq!(plan.filter.unwrap().to_string(), "equals(id,7)");
    }

    #[test]
    fn test_explain_rejection_is_error() {
        let dir = TempDir::new().unwrap();
        let request = ExplainRequest {
            resource_type: "widgets".into(),
            ..write_fixture(&dir)
        };

        let err = explain(&request).unwrap_err();
        assert_eq!(err.code_str(), "COMPOSE_UNKNOWN_RESOURCE_TYPE");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").to_string(), "42");
        assert_eq!(parse_id("abc").to_string(), "'abc'");
    }
}
