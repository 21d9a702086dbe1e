//! Query plan trees
//!
//! The output of composition: one [`QueryPlanNode`] per resource type to
//! fetch, nested through [`FieldSelection`]s, plus explain rendering.

mod explain;
mod node;
mod selection;

pub use explain::{ExplainNode, ExplainPlan};
pub use node::QueryPlanNode;
pub use selection::FieldSelection;
