//! Observability for the composition engine
//!
//! Structured logging goes through `tracing`. Records carry an `event` field
//! from [`ComposeEvent`] plus the resource type and scope they concern:
//!
//! ```ignore
//! tracing::debug!(event = %ComposeEvent::IncludeExpanded, resource_type = "articles", relationship = "author");
//! ```
//!
//! Composition itself logs at `debug`/`trace`, rejections at `warn`. Library
//! code never installs a subscriber; binaries call [`init_logging`].

mod events;

pub use events::ComposeEvent;

use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_directive` when set. Returns
/// false if a global subscriber was already installed.
pub fn init_logging(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
