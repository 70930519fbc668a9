//! Subscriber installation and filter resolution.

use tracing_subscriber::EnvFilter;

/// Directive applied when `RUST_LOG` is unset or does not parse.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the JSON subscriber, filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already set; the existing
/// one is left in place.
pub fn init() -> bool {
    let directive = std::env::var("RUST_LOG").ok();

    tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(directive.as_deref()))
        .json()
        .with_current_span(true)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok()
}

fn resolve_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
