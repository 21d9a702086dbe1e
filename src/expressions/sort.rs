//! Sort expressions

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field_chain::FieldChain;

/// What a sort element orders by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortTarget {
    /// Attribute value reached through the chain
    Field(FieldChain),
    /// Number of resources in the to-many relationship at the end of the chain
    Count(FieldChain),
}

impl SortTarget {
    /// The chain this target navigates
    pub fn chain(&self) -> &FieldChain {
        match self {
            SortTarget::Field(chain) | SortTarget::Count(chain) => chain,
        }
    }
}

/// One ordering key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortElement {
    pub target: SortTarget,
    pub ascending: bool,
}

impl SortElement {
    pub fn asc(field: impl Into<FieldChain>) -> Self {
        Self {
            target: SortTarget::Field(field.into()),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<FieldChain>) -> Self {
        Self {
            target: SortTarget::Field(field.into()),
            ascending: false,
        }
    }

    pub fn by_count(relationship: impl Into<FieldChain>, ascending: bool) -> Self {
        Self {
            target: SortTarget::Count(relationship.into()),
            ascending,
        }
    }
}

impl fmt::Display for SortElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.ascending {
            write!(f, "-")?;
        }
        match &self.target {
            SortTarget::Field(chain) => write!(f, "{}", chain),
            SortTarget::Count(chain) => write!(f, "count({})", chain),
        }
    }
}

/// Ordered list of sort keys, most significant first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortExpression {
    elements: Vec<SortElement>,
}

impl SortExpression {
    pub fn new(elements: Vec<SortElement>) -> Self {
        Self { elements }
    }

    /// Ascending sort on a single field
    pub fn ascending_by(field: impl Into<FieldChain>) -> Self {
        Self::new(vec![SortElement::asc(field)])
    }

    pub fn elements(&self) -> &[SortElement] {
        &self.elements
    }
}

impl fmt::Display for SortExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}
