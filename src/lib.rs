//! deber - Debian packaging in disposable Docker containers
//!
//! A build is a fixed sequence of thirteen named steps (`check`, `build`,
//! `create`, `start`, `tarball`, `scan`, `update`, `deps`, `package`, `test`,
//! `stop`, `remove`, `archive`). Each step looks at the current state of the
//! image, container and directories before acting, so an interrupted build
//! resumes where it stopped when run again.
//!
//! # Example Usage
//!
//! ```no_run
//! use deber::naming::{ResourceNames, PROGRAM};
//! use deber::pipeline::{StepContext, StepPipeline, StepSelection};
//! use deber::progress::LoggingHandler;
//! use deber::{DeberConfig, DockerEnvironment, PackageMetadata};
//! use std::path::Path;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = DeberConfig::default();
//! let metadata = PackageMetadata::from_source_dir(Path::new("."))?;
//! let names = ResourceNames::new(
//!     PROGRAM,
//!     &metadata.target_distribution,
//!     &metadata.source_name,
//!     &metadata.package_version,
//!     Path::new("."),
//!     config.home_dir()?,
//! );
//! let env = DockerEnvironment::connect(config.image_max_age_days, config.stop_timeout()).await?;
//!
//! let ctx = StepContext::new(&env, &metadata, &names, &config);
//! let report = StepPipeline::new(Box::new(LoggingHandler))
//!     .run(&StepSelection::All, &ctx)
//!     .await?;
//! println!("{} steps done", report.done_count());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`pipeline`]: step catalogue, selection and the fail-fast runner
//! - [`environment`]: the container runtime seam and its Docker implementation
//! - [`naming`]: deterministic image, container and directory names
//! - [`debian`]: package metadata from `debian/changelog`

pub mod cli;
pub mod config;
pub mod debian;
pub mod environment;
pub mod naming;
pub mod pipeline;
pub mod progress;
pub mod util;

pub use config::{ConfigError, DeberConfig};
pub use debian::{ChangelogError, PackageMetadata};
pub use environment::{DockerEnvironment, Environment, EnvironmentError};
pub use naming::ResourceNames;
pub use pipeline::{PipelineError, PipelineReport, StepPipeline, StepSelection, StepStatus};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
