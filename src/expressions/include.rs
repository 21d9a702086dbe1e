//! Relationship inclusion trees

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::field_chain::FieldChain;

/// A relationship to include, with the relationships to include beneath it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IncludeElement {
    pub relationship: String,
    pub children: BTreeSet<IncludeElement>,
}

impl IncludeElement {
    /// Leaf element without children
    pub fn new(relationship: impl Into<String>) -> Self {
        Self {
            relationship: relationship.into(),
            children: BTreeSet::new(),
        }
    }

    pub fn with_children(
        relationship: impl Into<String>,
        children: impl IntoIterator<Item = IncludeElement>,
    ) -> Self {
        Self {
            relationship: relationship.into(),
            children: children.into_iter().collect(),
        }
    }

    fn depth(&self) -> usize {
        1 + self.children.iter().map(IncludeElement::depth).max().unwrap_or(0)
    }

    fn collect_paths(&self, prefix: &FieldChain, paths: &mut Vec<String>) {
        let chain = prefix.child(&self.relationship);
        if self.children.is_empty() {
            paths.push(chain.to_string());
        }
        for child in &self.children {
            child.collect_paths(&chain, paths);
        }
    }
}

/// Merges elements that name the same relationship, unioning their children
/// recursively. The result has at most one element per relationship.
pub fn merge_elements(elements: impl IntoIterator<Item = IncludeElement>) -> BTreeSet<IncludeElement> {
    let mut merged: Vec<IncludeElement> = Vec::new();
    for element in elements {
        match merged
            .iter_mut()
            .find(|existing| existing.relationship == element.relationship)
        {
            Some(existing) => {
                let children = std::mem::take(&mut existing.children);
                existing.children = merge_elements(children.into_iter().chain(element.children));
            }
            None => merged.push(IncludeElement {
                relationship: element.relationship,
                children: merge_elements(element.children),
            }),
        }
    }
    merged.into_iter().collect()
}

/// The full set of relationships to include
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct IncludeExpression {
    elements: BTreeSet<IncludeElement>,
}

impl IncludeExpression {
    pub fn new(elements: impl IntoIterator<Item = IncludeElement>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a tree from dotted relationship paths (`comments.author`)
    pub fn from_paths<S: AsRef<str>>(paths: impl IntoIterator<Item = S>) -> Self {
        let elements = paths.into_iter().filter_map(|path| {
            let chain = FieldChain::parse(path.as_ref());
            chain
                .fields()
                .iter()
                .rev()
                .fold(None, |child: Option<IncludeElement>, relationship| {
                    Some(IncludeElement::with_children(relationship.clone(), child))
                })
        });
        Self {
            elements: merge_elements(elements),
        }
    }

    pub fn elements(&self) -> &BTreeSet<IncludeElement> {
        &self.elements
    }

    pub fn into_elements(self) -> BTreeSet<IncludeElement> {
        self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of relationship levels; zero when empty
    pub fn depth(&self) -> usize {
        self.elements.iter().map(IncludeElement::depth).max().unwrap_or(0)
    }

    /// Leaf paths in dotted notation, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        let root = FieldChain::new(Vec::<String>::new());
        for element in &self.elements {
            element.collect_paths(&root, &mut paths);
        }
        paths
    }
}

impl fmt::Display for IncludeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.paths().join(","))
    }
}

impl From<Vec<String>> for IncludeExpression {
    fn from(paths: Vec<String>) -> Self {
        Self::from_paths(paths)
    }
}

impl From<IncludeExpression> for Vec<String> {
    fn from(include: IncludeExpression) -> Self {
        include.paths()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paths_builds_tree() {
        let include = IncludeExpression::from_paths(["comments.author", "author", "comments"]);

        assert_eq!(include.elements().len(), 2);
        assert_eq!(include.depth(), 2);
        assert_eq!(include.paths(), vec!["author", "comments.author"]);
        assert_eq!(include.to_string(), "author,comments.author");
    }

    #[test]
    fn test_merge_unions_children() {
        let merged = merge_elements([
            IncludeElement::new("comments"),
            IncludeElement::with_children("comments", [IncludeElement::new("author")]),
        ]);

        assert_eq!(merged.len(), 1);
        let comments = merged.iter().next().unwrap();
        assert_eq!(comments.children.len(), 1);
    }

    #[test]
    fn test_empty_include() {
        let include = IncludeExpression::empty();
        assert!(include.is_empty());
        assert_eq!(include.depth(), 0);
        assert_eq!(include.to_string(), "");
    }
}
