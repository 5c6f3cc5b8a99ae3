//! Tracing subscriber setup for hosts embedding the engine.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install a global `fmt` subscriber configured from `config`.
///
/// `config.level` is parsed as an [`EnvFilter`] directive; an unparsable
/// directive falls back to `info`. Returns `false` if a global subscriber
/// was already installed, which makes repeated calls from tests harmless.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
