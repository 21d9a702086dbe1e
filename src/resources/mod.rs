//! Resource metadata
//!
//! Resource types, the graph that connects them, and the loaders and caches
//! built on top of it.

mod errors;
mod graph;
mod loader;
mod types;
mod viewable;

pub use errors::{GraphError, GraphResult};
pub use graph::{InMemoryResourceGraph, ResolvedChain, ResourceGraph, ResourceGraphBuilder};
pub use loader::ResourceGraphLoader;
pub use types::{AttributeDef, FieldRef, RelationshipDef, RelationshipKind, ResourceType};
pub use viewable::ViewableFieldCache;
