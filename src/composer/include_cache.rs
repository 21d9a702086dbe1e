//! Evaluated include cache
//!
//! Holds the include tree a composition finally resolved so the serializer can
//! reuse it. Written at most once per request.

use std::cell::OnceCell;

use crate::expressions::IncludeExpression;

#[derive(Debug, Default)]
pub struct EvaluatedIncludeCache {
    include: OnceCell<IncludeExpression>,
}

impl EvaluatedIncludeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the include tree. Returns false if one was already stored, in
    /// which case the first value is kept.
    pub fn set(&self, include: IncludeExpression) -> bool {
        self.include.set(include).is_ok()
    }

    pub fn get(&self) -> Option<&IncludeExpression> {
        self.include.get()
    }

    /// Returns the stored tree, computing and freezing it on first read
    pub fn get_or_init(&self, fallback: impl FnOnce() -> IncludeExpression) -> &IncludeExpression {
        self.include.get_or_init(fallback)
    }
}
