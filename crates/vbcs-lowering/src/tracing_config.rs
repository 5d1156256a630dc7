//! Tracing configuration for inspecting conversion decisions.
//!
//! The engines log which qualification rule fired, which lowering template
//! was chosen and which null-flow facts were found. Output format is chosen
//! with `VBCS_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented spans via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! VBCS_LOG=vbcs_lowering=trace VBCS_LOG_FORMAT=tree cargo test -p vbcs-lowering
//! ```
//!
//! Nothing is installed unless `VBCS_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a `VBCS_LOG_FORMAT` value. Unknown values select `Text`.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("VBCS_LOG_FORMAT").unwrap_or_default())
    }
}

/// `VBCS_LOG` wins over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("VBCS_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber, writing to stderr.
///
/// A no-op when neither variable is set. Later calls, or calls after another
/// subscriber was installed, leave the existing one in place, so every test
/// binary can call this from its fixtures.
pub fn init_tracing() {
    if std::env::var("VBCS_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    // An error here only means a subscriber is already installed.
    let _ = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish()
            .try_init(),
    };
}

#[cfg(test)]
#[path = "../tests/tracing_config.rs"]
mod tests;
