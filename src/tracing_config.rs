//! Opt-in tracing for hosts embedding the analysis.
//!
//! The resolver and driver emit `trace!`/`debug!` events and spans (one span
//! per analyzed body, one per checked statement). Nothing is printed unless a
//! host installs a subscriber; [`init_tracing`] installs one from the
//! environment:
//!
//! - `TSCOND_LOG` (falling back to `RUST_LOG`): filter directives, e.g.
//!   `debug` or `tscond_checker::resolver=trace`
//! - `TSCOND_LOG_FORMAT`: `text` (default), `tree` or `json`
//!
//! ```bash
//! TSCOND_LOG=tscond_checker=trace TSCOND_LOG_FORMAT=tree my-linter src/
//! ```
//!
//! Output always goes to stderr.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "TSCOND_LOG";
const FORMAT_VAR: &str = "TSCOND_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Flat `tracing-subscriber` lines.
    #[default]
    Text,
    /// Indented span tree via `tracing-tree`; follows resolution chains well.
    Tree,
    /// Newline-delimited JSON.
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively. Unknown names mean [`LogFormat::Text`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        std::env::var(FORMAT_VAR)
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }
}

/// `TSCOND_LOG` wins over `RUST_LOG`. `None` when neither is set.
fn filter_from_env() -> Option<EnvFilter> {
    if let Ok(directives) = std::env::var(LOG_VAR) {
        return Some(EnvFilter::builder().parse_lossy(directives));
    }
    std::env::var("RUST_LOG")
        .is_ok()
        .then(EnvFilter::from_default_env)
}

/// Install a global subscriber configured from the environment.
///
/// Returns `false` when no filter variable is set or another subscriber is
/// already installed.
pub fn init_tracing() -> bool {
    let Some(filter) = filter_from_env() else {
        return false;
    };

    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree).try_init().is_ok()
        }
        LogFormat::Json => {
            let json = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json).try_init().is_ok()
        }
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}
