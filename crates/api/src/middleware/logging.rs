//! Logging initialization.
//!
//! Format and level come from `[logging]` config; a `RUST_LOG` value overrides
//! the configured level entirely, which keeps local debugging one env var away.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Directive string used when `RUST_LOG` is unset: the configured level, with
/// the chattiest dependencies pinned to warn.
fn default_directives(level: &str) -> String {
    format!("{level},hyper=warn,reqwest=warn,sqlx=warn")
}

/// Initializes the tracing subscriber. Call once, before the first request.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true)
                    .with_target(true),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().pretty().with_span_events(FmtSpan::CLOSE))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_quiet_dependencies() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("hyper=warn"));
        assert!(directives.contains("sqlx=warn"));
    }
}
