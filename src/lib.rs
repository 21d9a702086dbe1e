//! jsonapi-compose - JSON:API query constraint composition
//!
//! Turns the scoped constraints of a request (filters, sorts, page windows,
//! sparse field sets and include trees) into a tree of query plan nodes the
//! storage layer can execute.

pub mod cli;
pub mod composer;
pub mod expressions;
pub mod observability;
pub mod plan;
pub mod resources;
