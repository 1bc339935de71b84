//! Logging setup
//!
//! Warnings (unknown attributes, controls without a target) are always on.
//! Debug mode adds discovery and compilation decisions for the carousel
//! crates. `RUST_LOG` overrides both.

use tracing_subscriber::EnvFilter;

/// Targets that make up the carousel logs
pub const CRATES: &[&str] = &[
    "carousel_dom",
    "carousel_html",
    "carousel_config",
    "carousel_engine",
    "carousel_inspect",
];

/// Filter used when `RUST_LOG` is unset
pub fn default_directives(debug: bool) -> String {
    let level = if debug { "debug" } else { "warn" };
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

pub fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(debug)))
}

/// Install a stderr fmt subscriber. Returns false if one was already set.
pub fn init(debug: bool) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init()
        .is_ok()
}
