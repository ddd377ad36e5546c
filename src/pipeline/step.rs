use super::error::PipelineError;
use crate::config::DeberConfig;
use crate::debian::PackageMetadata;
use crate::environment::Environment;
use crate::naming::ResourceNames;
use async_trait::async_trait;
use std::fmt;

/// Why a step took no action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The state already satisfies the step's goal
    Satisfied,
    /// Nothing applies to this package (e.g. no upstream tarball)
    NotApplicable,
    /// The package is already archived; the whole run ends successfully
    AlreadyArchived,
}

/// Result of a step that did not fail. Failure is the `Err` arm of
/// [`BuildStep::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Skipped(SkipReason),
}

impl StepStatus {
    pub fn is_done(self) -> bool {
        matches!(self, StepStatus::Done)
    }

    pub fn is_skipped(self) -> bool {
        matches!(self, StepStatus::Skipped(_))
    }

    /// Whether later steps must not run
    pub fn halts_pipeline(self) -> bool {
        matches!(self, StepStatus::Skipped(SkipReason::AlreadyArchived))
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Done => write!(f, "done"),
            StepStatus::Skipped(_) => write!(f, "skipped"),
        }
    }
}

/// Everything a step may look at or act upon
pub struct StepContext<'a> {
    pub env: &'a dyn Environment,
    pub metadata: &'a PackageMetadata,
    pub names: &'a ResourceNames,
    pub config: &'a DeberConfig,
}

impl<'a> StepContext<'a> {
    pub fn new(
        env: &'a dyn Environment,
        metadata: &'a PackageMetadata,
        names: &'a ResourceNames,
        config: &'a DeberConfig,
    ) -> Self {
        Self {
            env,
            metadata,
            names,
            config,
        }
    }

    /// Runs a command in the package's container, failing on non-zero exit
    pub async fn exec(&self, command: &[String]) -> Result<(), PipelineError> {
        let code = self
            .env
            .exec_in_container(&self.names.container, command)
            .await?;
        if code != 0 {
            return Err(PipelineError::ToolExecution {
                command: command.join(" "),
                code,
            });
        }
        Ok(())
    }
}

/// One named stage of a build.
///
/// Steps are stateless: every run queries the current state first and acts
/// only when the goal is not met yet.
#[async_trait]
pub trait BuildStep: Send + Sync {
    /// Name used on the command line and for include/exclude matching
    fn name(&self) -> &'static str;

    /// Short progress title, e.g. "Building image"
    fn title(&self) -> &'static str;

    fn description(&self) -> &'static [&'static str];

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError>;
}

/// Builds an owned argv from string literals
pub(crate) fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}
