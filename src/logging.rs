//! Diagnostic logging.
//!
//! User-facing messages go through [`crate::ui::Ui`]. This layer is for
//! tracing filesystem mutations and is silent unless `NPMRC_LOG` asks for it,
//! e.g. `NPMRC_LOG=debug npmrc work`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "NPMRC_LOG";

/// Install the global subscriber, writing to stderr.
///
/// Calling it twice is a no-op.
pub fn init_logging(color: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .with_ansi(color),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(false);
        init_logging(false);
        tracing::debug!("logging initialised");
    }
}
