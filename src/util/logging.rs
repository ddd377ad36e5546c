//! Structured logging setup for deber
//!
//! Logs always go to stderr: stdout carries the output of the commands run
//! inside the build container.
//!
//! # Example
//!
//! ```no_run
//! use deber::util::logging;
//!
//! logging::init_from_env();
//!
//! tracing::info!(step = "build", "Building image");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Dependencies whose chatter is capped at `warn` unless `RUST_LOG` says otherwise
const NOISY_TARGETS: [&str; 4] = ["bollard", "hyper", "h2", "reqwest"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level for deber's own events
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., deber::environment) in logs
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Reads `DEBER_LOG_LEVEL` and `DEBER_LOG_JSON`
    pub fn from_env() -> Self {
        let level = env::var("DEBER_LOG_LEVEL")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| parse_level(&v))
            .unwrap_or(Level::INFO);

        Self {
            level,
            use_json: json_from_env(),
            ..Default::default()
        }
    }

    /// Resolves the level from command-line flags, falling back to the
    /// environment. An explicit `--log-level` wins over `-v` and `-q`.
    pub fn from_flags(log_level: Option<&str>, verbose: bool, quiet: bool) -> Self {
        let level = match log_level {
            Some(level) => parse_level(level),
            None if verbose => Level::DEBUG,
            None if quiet => Level::ERROR,
            None => return Self::from_env(),
        };

        Self {
            level,
            use_json: json_from_env(),
            ..Default::default()
        }
    }

    /// Directive list used when `RUST_LOG` is not set
    pub fn default_directives(&self) -> Vec<String> {
        let mut directives = vec![format!("deber={}", self.level)];
        directives.extend(NOISY_TARGETS.iter().map(|t| format!("{}=warn", t)));
        directives
    }
}

fn json_from_env() -> bool {
    env::var("DEBER_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}

/// Parses a log level, case-insensitive. Unknown values fall back to INFO.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Initializes the subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            config
                .default_directives()
                .iter()
                .filter_map(|d| d.parse::<Directive>().ok())
                .fold(EnvFilter::new(""), |filter, directive| {
                    filter.add_directive(directive)
                })
        };

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(config.include_target)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(config.include_target)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}

pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}
