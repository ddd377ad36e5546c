//! Configuration management for deber
//!
//! Settings come from environment variables with sensible defaults. Unset and
//! empty variables both fall back to the default.
//!
//! # Environment Variables
//!
//! - `DEBER_DPKG_BUILDPACKAGE_FLAGS`: flags for the package builder - default: "-tc"
//! - `DEBER_LINTIAN_FLAGS`: flags for the linter - default: "-i"
//! - `DEBER_HOME`: root of the build and archive trees - default: "$HOME/deber"
//! - `DEBER_IMAGE_MAX_AGE_DAYS`: age after which a build image is rebuilt - default: "14"
//! - `DEBER_STOP_TIMEOUT`: seconds to wait for a container to stop - default: "10"
//! - `DEBER_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use deber::DeberConfig;
//!
//! let config = DeberConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DPKG_BUILDPACKAGE_FLAGS: &str = "-tc";
pub const DEFAULT_LINTIAN_FLAGS: &str = "-i";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_IMAGE_MAX_AGE_DAYS: i64 = 14;
const DEFAULT_STOP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Home directory could not be determined and DEBER_HOME is unset
    #[error("Cannot determine home directory. Set DEBER_HOME environment variable")]
    MissingHome,

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct DeberConfig {
    /// Flags passed to dpkg-buildpackage in the `package` step
    pub dpkg_buildpackage_flags: String,

    /// Flags passed to lintian in the `test` step
    pub lintian_flags: String,

    /// Root of the build and archive trees
    pub home: Option<PathBuf>,

    /// Build images older than this are rebuilt
    pub image_max_age_days: i64,

    /// Upper bound on waiting for a container to stop
    pub stop_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Default for DeberConfig {
    fn default() -> Self {
        let dpkg_buildpackage_flags = non_empty_var("DEBER_DPKG_BUILDPACKAGE_FLAGS")
            .unwrap_or_else(|| DEFAULT_DPKG_BUILDPACKAGE_FLAGS.to_string());

        let lintian_flags =
            non_empty_var("DEBER_LINTIAN_FLAGS").unwrap_or_else(|| DEFAULT_LINTIAN_FLAGS.to_string());

        let home = non_empty_var("DEBER_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join("deber")));

        let image_max_age_days = non_empty_var("DEBER_IMAGE_MAX_AGE_DAYS")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_IMAGE_MAX_AGE_DAYS);

        let stop_timeout_secs = non_empty_var("DEBER_STOP_TIMEOUT")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_STOP_TIMEOUT_SECS);

        let log_level = non_empty_var("DEBER_LOG_LEVEL")
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            dpkg_buildpackage_flags,
            lintian_flags,
            home,
            image_max_age_days,
            stop_timeout_secs,
            log_level,
        }
    }
}

impl DeberConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_dpkg_buildpackage_flags(mut self, flags: impl Into<String>) -> Self {
        self.dpkg_buildpackage_flags = flags.into();
        self
    }

    pub fn with_lintian_flags(mut self, flags: impl Into<String>) -> Self {
        self.lintian_flags = flags.into();
        self
    }

    pub fn with_image_max_age_days(mut self, days: i64) -> Self {
        self.image_max_age_days = days;
        self
    }

    pub fn with_stop_timeout(mut self, secs: u64) -> Self {
        self.stop_timeout_secs = secs;
        self
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the home directory is unknown or a value is
    /// out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.home.is_none() {
            return Err(ConfigError::MissingHome);
        }
        if self.image_max_age_days <= 0 {
            return Err(ConfigError::ValidationFailed(
                "Image max age must be at least 1 day".to_string(),
            ));
        }
        if self.stop_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Stop timeout must be at least 1 second".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn home_dir(&self) -> Result<&PathBuf, ConfigError> {
        self.home.as_ref().ok_or(ConfigError::MissingHome)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }

    /// `dpkg-buildpackage` argv
    pub fn package_command(&self) -> Vec<String> {
        command_with_flags("dpkg-buildpackage", &self.dpkg_buildpackage_flags)
    }

    /// `lintian` argv
    pub fn lint_command(&self) -> Vec<String> {
        command_with_flags("lintian", &self.lintian_flags)
    }
}

fn command_with_flags(program: &str, flags: &str) -> Vec<String> {
    std::iter::once(program.to_string())
        .chain(flags.split_whitespace().map(str::to_string))
        .collect()
}

impl fmt::Display for DeberConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deber Configuration:")?;
        writeln!(f, "  dpkg-buildpackage flags: {}", self.dpkg_buildpackage_flags)?;
        writeln!(f, "  lintian flags: {}", self.lintian_flags)?;
        if let Some(ref home) = self.home {
            writeln!(f, "  Home: {}", home.display())?;
        }
        writeln!(f, "  Image Max Age: {} days", self.image_max_age_days)?;
        writeln!(f, "  Stop Timeout: {}s", self.stop_timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
