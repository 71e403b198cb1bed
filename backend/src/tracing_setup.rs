//! Log output for applications embedding the search core.
//!
//! `KBSEARCH_LOG` takes precedence over `RUST_LOG`; without either, `info` and above
//! are written to stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV_VAR: &str = "KBSEARCH_LOG";
const DEFAULT_DIRECTIVES: &str = "info";

/// Installs the global subscriber. Returns an error if one is already set.
pub fn init_tracing() -> anyhow::Result<()> {
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(true).compact();
    tracing_subscriber::registry()
        .with(build_env_filter())
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn build_env_filter() -> EnvFilter {
    // unparseable directives fall through to the next source
    for var in [LOG_ENV_VAR, "RUST_LOG"] {
        if let Ok(directives) = std::env::var(var)
            && let Ok(filter) = EnvFilter::try_new(&directives)
        {
            return filter;
        }
    }
    EnvFilter::new(DEFAULT_DIRECTIVES)
}
