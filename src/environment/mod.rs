//! Build environment: images, containers and commands run inside them
//!
//! The pipeline only talks to the [`Environment`] trait. [`DockerEnvironment`]
//! is the production implementation; tests substitute an in-memory fake.

pub mod docker;
pub mod dockerfile;
pub mod registry;

use crate::naming::ResourceNames;
use async_trait::async_trait;
use thiserror::Error;

pub use docker::DockerEnvironment;
pub use registry::DockerHub;

/// Base distribution repositories searched for a tag matching the target
/// distribution, in order
pub const BASE_REPOSITORIES: [&str; 2] = ["debian", "ubuntu"];

/// Errors raised by the container runtime or the image registry
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("Failed to connect to Docker: {0}")]
    Connection(String),

    #[error("Docker {operation} failed for '{target}': {source}")]
    Docker {
        operation: &'static str,
        target: String,
        #[source]
        source: bollard::errors::Error,
    },

    #[error("Image build failed for '{image}': {message}")]
    Build { image: String, message: String },

    #[error("Failed to list tags of '{repository}': {source}")]
    Registry {
        repository: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to prepare {what}: {source}")]
    Io {
        what: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// Idempotency queries and mutations over images and containers.
///
/// Every call blocks the pipeline until the runtime has finished; the
/// orchestrator never overlaps them.
#[async_trait]
pub trait Environment: Send + Sync {
    async fn image_exists(&self, image: &str) -> Result<bool, EnvironmentError>;

    /// Whether an existing image should be rebuilt
    async fn image_is_stale(&self, image: &str) -> Result<bool, EnvironmentError>;

    /// Builds `image` on top of `base` (e.g. `debian:bullseye`)
    async fn build_image(&self, image: &str, base: &str) -> Result<(), EnvironmentError>;

    /// Tags offered by a base distribution repository. `name_filter` narrows
    /// the listing to tags containing it (empty lists everything); callers
    /// still match exactly.
    async fn list_available_tags(
        &self,
        repository: &str,
        name_filter: &str,
    ) -> Result<Vec<String>, EnvironmentError>;

    async fn container_exists(&self, container: &str) -> Result<bool, EnvironmentError>;

    async fn container_is_running(&self, container: &str) -> Result<bool, EnvironmentError>;

    async fn container_is_stopped(&self, container: &str) -> Result<bool, EnvironmentError>;

    /// Creates the container described by `names` with its bind mounts
    async fn create_container(&self, names: &ResourceNames) -> Result<(), EnvironmentError>;

    async fn start_container(&self, container: &str) -> Result<(), EnvironmentError>;

    /// Stops within the runtime's bounded timeout
    async fn stop_container(&self, container: &str) -> Result<(), EnvironmentError>;

    async fn remove_container(&self, container: &str) -> Result<(), EnvironmentError>;

    /// Runs `command` inside the container and returns its exit code
    async fn exec_in_container(
        &self,
        container: &str,
        command: &[String],
    ) -> Result<i64, EnvironmentError>;
}
