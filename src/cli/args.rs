//! CLI argument definitions using clap
//!
//! Commands:
//! - jsonapi-compose explain --graph <dir> --constraints <file> --type <name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Composes JSON:API query constraints into query plans
#[derive(Parser, Debug)]
#[command(name = "jsonapi-compose")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose a constraint set and print the resulting plan
    Explain {
        /// Directory of resource type definitions (one *.json file per type)
        #[arg(long)]
        graph: PathBuf,

        /// JSON file holding an array of scoped constraints
        #[arg(long)]
        constraints: PathBuf,

        /// Primary resource type of the request
        #[arg(long = "type", value_name = "NAME")]
        resource_type: String,

        /// Composer options file
        #[arg(long)]
        options: Option<PathBuf>,

        /// Compose for a single resource with this id
        #[arg(long)]
        id: Option<String>,

        /// Compose the secondary endpoint for this relationship (requires --id)
        #[arg(long, requires = "id")]
        relationship: Option<String>,

        /// Log composition steps to stderr
        #[arg(long)]
        verbose: bool,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
