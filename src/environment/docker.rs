use super::dockerfile::{self, CONTAINER_ARCHIVE_DIR, CONTAINER_BUILD_DIR, CONTAINER_SOURCE_DIR};
use super::registry::DockerHub;
use super::{Environment, EnvironmentError};
use crate::naming::ResourceNames;
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, LogOutput, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::exec::{CreateExecOptions, StartExecResults};
use bollard::image::BuildImageOptions;
use bollard::models::{ContainerStateStatusEnum, HostConfig};
use bollard::Docker;
use bytes::Bytes;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures_util::stream::StreamExt;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

const DOCKER_SOCKET_PATH: &str = "/var/run/docker.sock";

/// Docker Engine backed environment
pub struct DockerEnvironment {
    docker: Docker,
    hub: DockerHub,
    image_max_age: ChronoDuration,
    stop_timeout: Duration,
}

impl DockerEnvironment {
    /// Connects to the local daemon and checks it answers
    pub async fn connect(
        image_max_age_days: i64,
        stop_timeout: Duration,
    ) -> Result<Self, EnvironmentError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| EnvironmentError::Connection(format!("{} ({})", e, DOCKER_SOCKET_PATH)))?;

        let version = docker
            .version()
            .await
            .map_err(|e| EnvironmentError::Connection(e.to_string()))?;
        debug!(
            api_version = version.api_version.as_deref().unwrap_or("unknown"),
            "Connected to Docker"
        );

        Ok(Self {
            docker,
            hub: DockerHub::new()?,
            image_max_age: ChronoDuration::days(image_max_age_days),
            stop_timeout,
        })
    }

    fn docker_error(
        operation: &'static str,
        target: &str,
    ) -> impl FnOnce(BollardError) -> EnvironmentError {
        let target = target.to_string();
        move |source| EnvironmentError::Docker {
            operation,
            target,
            source,
        }
    }

    async fn container_status(
        &self,
        container: &str,
    ) -> Result<Option<ContainerStateStatusEnum>, EnvironmentError> {
        match self
            .docker
            .inspect_container(container, None::<InspectContainerOptions>)
            .await
        {
            Ok(inspect) => Ok(Some(
                inspect
                    .state
                    .and_then(|s| s.status)
                    .unwrap_or(ContainerStateStatusEnum::EMPTY),
            )),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(Self::docker_error("inspect", container)(e)),
        }
    }
}

fn is_not_found(error: &BollardError) -> bool {
    matches!(
        error,
        BollardError::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}

/// Tar archive holding only the generated Dockerfile
fn build_context(dockerfile: &str) -> Result<Bytes, EnvironmentError> {
    let io_err = |source| EnvironmentError::Io {
        what: "image build context".to_string(),
        source,
    };

    let mut header = tar::Header::new_gnu();
    header.set_size(dockerfile.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    header.set_cksum();

    let mut builder = tar::Builder::new(Vec::new());
    builder
        .append_data(&mut header, "Dockerfile", dockerfile.as_bytes())
        .map_err(io_err)?;
    let archive = builder.into_inner().map_err(io_err)?;

    Ok(Bytes::from(archive))
}

fn is_older_than(created: &str, max_age: ChronoDuration, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(created) {
        Ok(created) => now.signed_duration_since(created.with_timezone(&Utc)) > max_age,
        // Unparseable timestamps force a rebuild rather than trusting the image
        Err(_) => true,
    }
}

#[async_trait]
impl Environment for DockerEnvironment {
    async fn image_exists(&self, image: &str) -> Result<bool, EnvironmentError> {
        match self.docker.inspect_image(image).await {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(Self::docker_error("inspect image", image)(e)),
        }
    }

    async fn image_is_stale(&self, image: &str) -> Result<bool, EnvironmentError> {
        let inspect = self
            .docker
            .inspect_image(image)
            .await
            .map_err(Self::docker_error("inspect image", image))?;

        let stale = match inspect.created.as_deref() {
            Some(created) => is_older_than(created, self.image_max_age, Utc::now()),
            None => true,
        };
        debug!(image, stale, "Image age checked");
        Ok(stale)
    }

    async fn build_image(&self, image: &str, base: &str) -> Result<(), EnvironmentError> {
        info!(image, base, "Building image");
        let context = build_context(&dockerfile::render(base))?;

        let options = BuildImageOptions {
            t: image.to_string(),
            dockerfile: "Dockerfile".to_string(),
            pull: true,
            rm: true,
            forcerm: true,
            ..Default::default()
        };

        let mut stream = self.docker.build_image(options, None, Some(context));
        while let Some(item) = stream.next().await {
            let info = item.map_err(Self::docker_error("build image", image))?;
            if let Some(line) = info.stream {
                let line = line.trim_end();
                if !line.is_empty() {
                    debug!(target: "deber::build", "{}", line);
                }
            }
            if let Some(error) = info.error {
                return Err(EnvironmentError::Build {
                    image: image.to_string(),
                    message: error,
                });
            }
        }

        Ok(())
    }

    async fn list_available_tags(
        &self,
        repository: &str,
        name_filter: &str,
    ) -> Result<Vec<String>, EnvironmentError> {
        let filter = (!name_filter.is_empty()).then_some(name_filter);
        self.hub.list_tags(repository, filter).await
    }

    async fn container_exists(&self, container: &str) -> Result<bool, EnvironmentError> {
        Ok(self.container_status(container).await?.is_some())
    }

    async fn container_is_running(&self, container: &str) -> Result<bool, EnvironmentError> {
        Ok(matches!(
            self.container_status(container).await?,
            Some(ContainerStateStatusEnum::RUNNING)
        ))
    }

    async fn container_is_stopped(&self, container: &str) -> Result<bool, EnvironmentError> {
        Ok(match self.container_status(container).await? {
            Some(status) => !matches!(
                status,
                ContainerStateStatusEnum::RUNNING
                    | ContainerStateStatusEnum::PAUSED
                    | ContainerStateStatusEnum::RESTARTING
            ),
            None => true,
        })
    }

    async fn create_container(&self, names: &ResourceNames) -> Result<(), EnvironmentError> {
        let binds = vec![
            format!("{}:{}", names.build_dir.display(), CONTAINER_BUILD_DIR),
            format!("{}:{}", names.source_dir.display(), CONTAINER_SOURCE_DIR),
            format!("{}:{}", names.archive_dir.display(), CONTAINER_ARCHIVE_DIR),
        ];

        let config = Config {
            image: Some(names.image.clone()),
            hostname: Some(names.container.replace(['_', '.'], "-")),
            working_dir: Some(CONTAINER_SOURCE_DIR.to_string()),
            host_config: Some(HostConfig {
                binds: Some(binds),
                ..Default::default()
            }),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: names.container.clone(),
            platform: None,
        };

        self.docker
            .create_container(Some(options), config)
            .await
            .map_err(Self::docker_error("create container", &names.container))?;

        Ok(())
    }

    async fn start_container(&self, container: &str) -> Result<(), EnvironmentError> {
        self.docker
            .start_container(container, None::<StartContainerOptions<String>>)
            .await
            .map_err(Self::docker_error("start container", container))
    }

    async fn stop_container(&self, container: &str) -> Result<(), EnvironmentError> {
        let options = StopContainerOptions {
            t: self.stop_timeout.as_secs() as i64,
        };
        self.docker
            .stop_container(container, Some(options))
            .await
            .map_err(Self::docker_error("stop container", container))
    }

    async fn remove_container(&self, container: &str) -> Result<(), EnvironmentError> {
        self.docker
            .remove_container(
                container,
                Some(RemoveContainerOptions {
                    force: false,
                    ..Default::default()
                }),
            )
            .await
            .map_err(Self::docker_error("remove container", container))
    }

    async fn exec_in_container(
        &self,
        container: &str,
        command: &[String],
    ) -> Result<i64, EnvironmentError> {
        debug!(container, command = ?command, "Executing in container");

        let exec = self
            .docker
            .create_exec(
                container,
                CreateExecOptions {
                    cmd: Some(command.to_vec()),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    working_dir: Some(CONTAINER_SOURCE_DIR.to_string()),
                    ..Default::default()
                },
            )
            .await
            .map_err(Self::docker_error("create exec", container))?;

        match self
            .docker
            .start_exec(&exec.id, None)
            .await
            .map_err(Self::docker_error("start exec", container))?
        {
            StartExecResults::Attached { mut output, .. } => {
                while let Some(chunk) = output.next().await {
                    match chunk.map_err(Self::docker_error("exec output", container))? {
                        LogOutput::StdErr { message } => {
                            forward_output(std::io::stderr(), &message);
                        }
                        LogOutput::StdOut { message } | LogOutput::Console { message } => {
                            forward_output(std::io::stdout(), &message);
                        }
                        LogOutput::StdIn { .. } => {}
                    }
                }
            }
            StartExecResults::Detached => {}
        }

        let inspect = self
            .docker
            .inspect_exec(&exec.id)
            .await
            .map_err(Self::docker_error("inspect exec", container))?;

        Ok(inspect.exit_code.unwrap_or(-1))
    }
}

/// Copies container output to a host stream; write failures are logged only
fn forward_output(mut out: impl Write, message: &[u8]) {
    if let Err(e) = out.write_all(message).and_then(|_| out.flush()) {
        debug!(error = %e, "Failed to forward container output");
    }
}
