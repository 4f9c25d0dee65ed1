//! Development-time tracing for the `dataio` binary.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Dev diagnostics via `RUST_LOG`, output to stderr.
//!   Library modules only emit events (root discovery, archive members,
//!   directory creation); installing a subscriber is left to the binary or
//!   to whatever application embeds the crate.
//!
//! - **Reports (`io/check`, CLI output)**: The existence check, layout
//!   summary and printed paths go to stdout. They are product output and
//!   unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset or unparsable.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=dataio=debug dataio layout
/// ```
pub fn init() {
    let raw = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(env_filter(raw.as_deref()))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn env_filter(raw: Option<&str>) -> EnvFilter {
    raw.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
