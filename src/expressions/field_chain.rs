//! Field chains and literal constants
//!
//! A field chain is a navigation path of attribute/relationship names rooted at
//! the resource type of the surrounding scope, e.g. `author.name`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered path of field names, rooted at the current scope.
///
/// Serialized in dotted notation (`"author.name"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldChain(Vec<String>);

impl FieldChain {
    /// Creates a chain from individual field names
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// Creates a single-field chain
    pub fn single(field: impl Into<String>) -> Self {
        Self(vec![field.into()])
    }

    /// Parses dotted notation. Empty segments are dropped.
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Returns the field names in order
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First field of the chain
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Last field of the chain
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns a new chain with `field` inserted at the head
    pub fn with_prefix(&self, field: &str) -> Self {
        let mut fields = Vec::with_capacity(self.0.len() + 1);
        fields.push(field.to_string());
        fields.extend(self.0.iter().cloned());
        Self(fields)
    }

    /// Returns a new chain with `field` appended
    pub fn child(&self, field: &str) -> Self {
        let mut fields = self.0.clone();
        fields.push(field.to_string());
        Self(fields)
    }
}

impl fmt::Display for FieldChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<String> for FieldChain {
    fn from(dotted: String) -> Self {
        Self::parse(&dotted)
    }
}

impl From<&str> for FieldChain {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<FieldChain> for String {
    fn from(chain: FieldChain) -> Self {
        chain.to_string()
    }
}

/// Typed constant value used on the right-hand side of comparisons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Literal(Value);

impl Literal {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            other => write!(f, "{}", other),
        }
    }
}

impl From<Value> for Literal {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self(Value::from(value))
    }
}

impl From<u64> for Literal {
    fn from(value: u64) -> Self {
        Self(Value::from(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self(Value::Bool(value))
    }
}
