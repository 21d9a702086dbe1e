//! Explain plan output
//!
//! Produces deterministic, human-readable explain output for a composed plan
//! tree, or for the error that rejected it.

use std::fmt;

use serde::Serialize;

use crate::composer::ComposeError;
use crate::expressions::IncludeExpression;

use super::node::QueryPlanNode;

/// One node of the explained plan tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainNode {
    pub resource_type: String,
    /// Relationship this node hangs off; `None` for the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<String>,
    /// Selected attributes; `None` selects all default fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ExplainNode>,
}

impl ExplainNode {
    fn from_node(node: &QueryPlanNode, relationship: Option<&str>) -> Self {
        let fields = node
            .selection
            .as_ref()
            .map(|selection| selection.attributes().map(str::to_string).collect());
        let children = node
            .selection
            .iter()
            .flat_map(|selection| selection.relationships())
            .map(|(name, nested)| ExplainNode::from_node(nested, Some(name)))
            .collect();

        Self {
            resource_type: node.resource_type.clone(),
            relationship: relationship.map(str::to_string),
            filter: node.filter.as_ref().map(ToString::to_string),
            sort: node.sort.as_ref().map(ToString::to_string),
            pagination: node.pagination.as_ref().map(ToString::to_string),
            fields,
            children,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match &self.relationship {
            Some(relationship) => writeln!(f, "{}Resource: {} (via {})", pad, self.resource_type, relationship)?,
            None => writeln!(f, "{}Resource: {}", pad, self.resource_type)?,
        }
        if let Some(filter) = &self.filter {
            writeln!(f, "{}  Filter: {}", pad, filter)?;
        }
        if let Some(sort) = &self.sort {
            writeln!(f, "{}  Sort: {}", pad, sort)?;
        }
        if let Some(pagination) = &self.pagination {
            writeln!(f, "{}  Page: {}", pad, pagination)?;
        }
        match &self.fields {
            Some(fields) => writeln!(f, "{}  Fields: {}", pad, fields.join(","))?,
            None => writeln!(f, "{}  Fields: *", pad)?,
        }
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainPlan {
    /// Whether composition succeeded
    pub accepted: bool,
    /// Plan tree (if accepted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<ExplainNode>,
    /// Evaluated include paths
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    /// Rejection error code (if rejected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
    /// Rejection reason (if rejected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a composed plan tree
    pub fn from_plan(plan: &QueryPlanNode, include: &IncludeExpression) -> Self {
        Self {
            accepted: true,
            root: Some(ExplainNode::from_node(plan, None)),
            include: include.paths(),
            rejection_code: None,
            rejection_reason: None,
        }
    }

    /// Creates an explain plan from a composition error
    pub fn from_error(err: &ComposeError) -> Self {
        Self {
            accepted: false,
            root: None,
            include: Vec::new(),
            rejection_code: Some(err.code().code().to_string()),
            rejection_reason: Some(err.detail()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if !self.include.is_empty() {
                writeln!(f, "Include: {}", self.include.join(","))?;
            }
            if let Some(root) = &self.root {
                root.write_indented(f, 0)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}
