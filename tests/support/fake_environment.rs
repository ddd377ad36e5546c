//! In-memory stand-in for the container runtime

use async_trait::async_trait;
use deber::environment::{Environment, EnvironmentError};
use deber::naming::ResourceNames;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy)]
struct FakeContainer {
    running: bool,
}

#[derive(Debug, Default)]
struct FakeState {
    /// image name -> stale
    images: HashMap<String, bool>,
    tags: HashMap<String, Vec<String>>,
    containers: HashMap<String, FakeContainer>,
    /// command prefix -> exit code
    failing_commands: Vec<(String, i64)>,
    failing_operations: Vec<String>,
    calls: Vec<String>,
}

/// Records every call and keeps just enough state to answer the
/// idempotency queries consistently with the mutations made so far.
#[derive(Debug)]
pub struct FakeEnvironment {
    state: Mutex<FakeState>,
}

const QUERIES: [&str; 6] = [
    "image_exists",
    "image_is_stale",
    "list_available_tags",
    "container_exists",
    "container_is_running",
    "container_is_stopped",
];

impl FakeEnvironment {
    /// Registry offering `debian:bullseye`, `debian:bookworm` and `ubuntu:jammy`
    pub fn new() -> Self {
        let mut state = FakeState::default();
        state.tags.insert(
            "debian".to_string(),
            vec!["bullseye".to_string(), "bookworm".to_string(), "sid".to_string()],
        );
        state
            .tags
            .insert("ubuntu".to_string(), vec!["jammy".to_string()]);
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn with_image(self, image: &str, stale: bool) -> Self {
        self.state
            .lock()
            .unwrap()
            .images
            .insert(image.to_string(), stale);
        self
    }

    pub fn with_container(self, container: &str, running: bool) -> Self {
        self.state
            .lock()
            .unwrap()
            .containers
            .insert(container.to_string(), FakeContainer { running });
        self
    }

    /// Commands starting with `prefix` exit with `code`
    pub fn fail_command(&self, prefix: &str, code: i64) {
        self.state
            .lock()
            .unwrap()
            .failing_commands
            .push((prefix.to_string(), code));
    }

    /// The named trait method returns an error
    pub fn fail_operation(&self, operation: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_operations
            .push(operation.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.failing_commands.clear();
        state.failing_operations.clear();
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Removes a container behind the pipeline's back
    pub fn forget_container(&self, container: &str) {
        self.state.lock().unwrap().containers.remove(container);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change state, queries left out
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| !QUERIES.iter().any(|q| call.starts_with(q)))
            .collect()
    }

    /// Commands run in containers, joined with spaces
    pub fn executed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix("exec ").map(str::to_string))
            .collect()
    }

    pub fn has_image(&self, image: &str) -> bool {
        self.state.lock().unwrap().images.contains_key(image)
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.state.lock().unwrap().containers.contains_key(container)
    }

    pub fn is_running(&self, container: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .containers
            .get(container)
            .is_some_and(|c| c.running)
    }

    fn record(&self, operation: &str, detail: String) -> Result<(), EnvironmentError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("{} {}", operation, detail));
        if state.failing_operations.iter().any(|op| op == operation) {
            return Err(EnvironmentError::Other(format!(
                "{} failed for {}",
                operation, detail
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Environment for FakeEnvironment {
    async fn image_exists(&self, image: &str) -> Result<bool, EnvironmentError> {
        self.record("image_exists", image.to_string())?;
        Ok(self.has_image(image))
    }

    async fn image_is_stale(&self, image: &str) -> Result<bool, EnvironmentError> {
        self.record("image_is_stale", image.to_string())?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .images
            .get(image)
            .copied()
            .unwrap_or(false))
    }

    async fn build_image(&self, image: &str, base: &str) -> Result<(), EnvironmentError> {
        self.record("build_image", format!("{} {}", image, base))?;
        self.state
            .lock()
            .unwrap()
            .images
            .insert(image.to_string(), false);
        Ok(())
    }

    async fn list_available_tags(
        &self,
        repository: &str,
        name_filter: &str,
    ) -> Result<Vec<String>, EnvironmentError> {
        self.record("list_available_tags", repository.to_string())?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .tags
            .get(repository)
            .map(|tags| {
                tags.iter()
                    .filter(|t| t.contains(name_filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn container_exists(&self, container: &str) -> Result<bool, EnvironmentError> {
        self.record("container_exists", container.to_string())?;
        Ok(self.has_container(container))
    }

    async fn container_is_running(&self, container: &str) -> Result<bool, EnvironmentError> {
        self.record("container_is_running", container.to_string())?;
        Ok(self.is_running(container))
    }

    async fn container_is_stopped(&self, container: &str) -> Result<bool, EnvironmentError> {
        self.record("container_is_stopped", container.to_string())?;
        Ok(!self.is_running(container))
    }

    async fn create_container(&self, names: &ResourceNames) -> Result<(), EnvironmentError> {
        self.record("create_container", names.container.clone())?;
        let mut state = self.state.lock().unwrap();
        if state.containers.contains_key(&names.container) {
            return Err(EnvironmentError::Other(format!(
                "container {} already exists",
                names.container
            )));
        }
        state
            .containers
            .insert(names.container.clone(), FakeContainer { running: false });
        Ok(())
    }

    async fn start_container(&self, container: &str) -> Result<(), EnvironmentError> {
        self.record("start_container", container.to_string())?;
        match self.state.lock().unwrap().containers.get_mut(container) {
            Some(c) => {
                c.running = true;
                Ok(())
            }
            None => Err(EnvironmentError::Other(format!(
                "no such container: {}",
                container
            ))),
        }
    }

    async fn stop_container(&self, container: &str) -> Result<(), EnvironmentError> {
        self.record("stop_container", container.to_string())?;
        if let Some(c) = self.state.lock().unwrap().containers.get_mut(container) {
            c.running = false;
        }
        Ok(())
    }

    async fn remove_container(&self, container: &str) -> Result<(), EnvironmentError> {
        self.record("remove_container", container.to_string())?;
        self.state.lock().unwrap().containers.remove(container);
        Ok(())
    }

    async fn exec_in_container(
        &self,
        container: &str,
        command: &[String],
    ) -> Result<i64, EnvironmentError> {
        let line = command.join(" ");
        self.record("exec", line.clone())?;

        let state = self.state.lock().unwrap();
        if !state.containers.get(container).is_some_and(|c| c.running) {
            return Err(EnvironmentError::Other(format!(
                "container {} is not running",
                container
            )));
        }
        Ok(state
            .failing_commands
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0))
    }
}
