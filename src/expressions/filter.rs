//! Filter expressions
//!
//! Closed sum type over every filter shape the engine understands. Every
//! algorithm that walks filters (inverse rewriting, join-less validation,
//! metadata checks) matches on this enum exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field_chain::{FieldChain, Literal};

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    Equals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "equals",
            ComparisonOperator::GreaterThan => "greaterThan",
            ComparisonOperator::GreaterOrEqual => "greaterOrEqual",
            ComparisonOperator::LessThan => "lessThan",
            ComparisonOperator::LessOrEqual => "lessOrEqual",
        }
    }
}

/// Logical connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

/// Text matching modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextMatchKind {
    Contains,
    StartsWith,
    EndsWith,
}

impl TextMatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextMatchKind::Contains => "contains",
            TextMatchKind::StartsWith => "startsWith",
            TextMatchKind::EndsWith => "endsWith",
        }
    }
}

/// Operand of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operand {
    /// Navigation path rooted at the current scope
    Field(FieldChain),
    /// Typed constant
    Literal(Literal),
    /// The null constant
    Null,
    /// Number of resources in a to-many relationship
    Count(FieldChain),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(chain) => write!(f, "{}", chain),
            Operand::Literal(literal) => write!(f, "{}", literal),
            Operand::Null => write!(f, "null"),
            Operand::Count(chain) => write!(f, "count({})", chain),
        }
    }
}

/// A filter expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FilterExpression {
    Comparison {
        operator: ComparisonOperator,
        left: Operand,
        right: Operand,
    },
    Logical {
        operator: LogicalOperator,
        terms: Vec<FilterExpression>,
    },
    Not {
        filter: Box<FilterExpression>,
    },
    AnyOf {
        target: FieldChain,
        constants: Vec<Literal>,
    },
    MatchText {
        target: FieldChain,
        #[serde(rename = "match")]
        match_kind: TextMatchKind,
        pattern: Literal,
    },
    /// Existence test over a to-many relationship. The inner filter is
    /// evaluated in the scope of the related resource type.
    Has {
        target: FieldChain,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<Box<FilterExpression>>,
    },
    /// Type-narrowing test over a polymorphic to-one relationship, or over the
    /// current resource when `target` is absent. The inner filter is evaluated
    /// in the scope of the derived type.
    IsType {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<FieldChain>,
        derived_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<Box<FilterExpression>>,
    },
}

impl FilterExpression {
    /// Creates a comparison between two operands
    pub fn comparison(operator: ComparisonOperator, left: Operand, right: Operand) -> Self {
        FilterExpression::Comparison {
            operator,
            left,
            right,
        }
    }

    /// Creates `equals(field, literal)`
    pub fn equals(field: impl Into<FieldChain>, value: impl Into<Literal>) -> Self {
        Self::comparison(
            ComparisonOperator::Equals,
            Operand::Field(field.into()),
            Operand::Literal(value.into()),
        )
    }

    /// Creates a logical expression over the given terms
    pub fn logical(operator: LogicalOperator, terms: Vec<FilterExpression>) -> Self {
        FilterExpression::Logical { operator, terms }
    }

    /// Negates a filter
    pub fn not(filter: FilterExpression) -> Self {
        FilterExpression::Not {
            filter: Box::new(filter),
        }
    }

    /// Creates `any(field, constants...)`. Duplicate constants are dropped,
    /// keeping first occurrence order.
    pub fn any_of(field: impl Into<FieldChain>, constants: impl IntoIterator<Item = Literal>) -> Self {
        let mut unique: Vec<Literal> = Vec::new();
        for constant in constants {
            if !unique.contains(&constant) {
                unique.push(constant);
            }
        }
        FilterExpression::AnyOf {
            target: field.into(),
            constants: unique,
        }
    }

    /// Creates a text match
    pub fn match_text(
        field: impl Into<FieldChain>,
        match_kind: TextMatchKind,
        pattern: impl Into<Literal>,
    ) -> Self {
        FilterExpression::MatchText {
            target: field.into(),
            match_kind,
            pattern: pattern.into(),
        }
    }

    /// Creates `has(relationship[, filter])`
    pub fn has(target: impl Into<FieldChain>, filter: Option<FilterExpression>) -> Self {
        FilterExpression::Has {
            target: target.into(),
            filter: filter.map(Box::new),
        }
    }

    /// Creates `isType([relationship], derivedType[, filter])`
    pub fn is_type(
        target: Option<FieldChain>,
        derived_type: impl Into<String>,
        filter: Option<FilterExpression>,
    ) -> Self {
        FilterExpression::IsType {
            target,
            derived_type: derived_type.into(),
            filter: filter.map(Box::new),
        }
    }

    /// Combines filters with the given operator.
    ///
    /// Zero filters yield `None`, a single filter is returned as-is, and two or
    /// more are wrapped in one logical expression in their original order.
    pub fn compose(
        operator: LogicalOperator,
        filters: impl IntoIterator<Item = FilterExpression>,
    ) -> Option<FilterExpression> {
        let mut terms: Vec<FilterExpression> = filters.into_iter().collect();
        match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(Self::logical(operator, terms)),
        }
    }

    /// AND over all given filters (see [`FilterExpression::compose`])
    pub fn and_all(filters: impl IntoIterator<Item = FilterExpression>) -> Option<FilterExpression> {
        Self::compose(LogicalOperator::And, filters)
    }

    /// AND of two optional filters. `None` is the identity element.
    pub fn and_optional(
        left: Option<FilterExpression>,
        right: Option<FilterExpression>,
    ) -> Option<FilterExpression> {
        Self::and_all(left.into_iter().chain(right))
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::Comparison {
                operator,
                left,
                right,
            } => write!(f, "{}({},{})", operator.as_str(), left, right),
            FilterExpression::Logical { operator, terms } => {
                write!(f, "{}(", operator.as_str())?;
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", term)?;
                }
                write!(f, ")")
            }
            FilterExpression::Not { filter } => write!(f, "not({})", filter),
            FilterExpression::AnyOf { target, constants } => {
                write!(f, "any({}", target)?;
                for constant in constants {
                    write!(f, ",{}", constant)?;
                }
                write!(f, ")")
            }
            FilterExpression::MatchText {
                target,
                match_kind,
                pattern,
            } => write!(f, "{}({},{})", match_kind.as_str(), target, pattern),
            FilterExpression::Has { target, filter } => match filter {
                Some(inner) => write!(f, "has({},{})", target, inner),
                None => write!(f, "has({})", target),
            },
            FilterExpression::IsType {
                target,
                derived_type,
                filter,
            } => {
                write!(f, "isType(")?;
                if let Some(target) = target {
                    write!(f, "{}", target)?;
                }
                write!(f, ",{}", derived_type)?;
                if let Some(inner) = filter {
                    write!(f, ",{}", inner)?;
                }
                write!(f, ")")
            }
        }
    }
}
