//! CLI module for jsonapi-compose
//!
//! Provides command-line interface for:
//! - explain: compose a constraint set against a resource graph and print the plan

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, run, run_command, ExplainRequest};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_constraints, write_json, write_text};
