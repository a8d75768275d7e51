//! Tracing subscriber setup for applications and demos.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_DIRECTIVES: &str = "info";

static TRACING_INSTALLED: Once = Once::new();

/// Installs a global `fmt` subscriber (idempotent).
///
/// `directives` uses the `RUST_LOG` syntax, e.g. `"trellis_core=trace,info"`.
/// Without it, or if it does not parse, the `RUST_LOG` environment variable is
/// used, and failing that `info`. Only the first call has an effect; a
/// subscriber installed elsewhere is left in place.
///
/// Returns `true` if this call installed the subscriber.
pub fn install_tracing(directives: Option<&str>) -> bool {
    let mut installed = false;
    TRACING_INSTALLED.call_once(|| {
        installed = tracing_subscriber::registry()
            .with(env_filter(directives))
            .with(fmt::layer().with_target(true))
            .try_init()
            .is_ok();
    });
    installed
}

/// Returns `true` once [`install_tracing`] has run.
#[must_use]
pub fn tracing_installed() -> bool {
    TRACING_INSTALLED.is_completed()
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
