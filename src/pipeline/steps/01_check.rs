use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{BuildStep, SkipReason, StepContext, StepStatus};
use async_trait::async_trait;
use tracing::info;

/// Gate for the whole run: an archived package needs no work
pub struct CheckStep;

#[async_trait]
impl BuildStep for CheckStep {
    fn name(&self) -> &'static str {
        "check"
    }

    fn title(&self) -> &'static str {
        "Checking archive"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Checks if the package is already built and archived.",
            "Ends the run successfully if it is.",
        ]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        let archived = &ctx.names.archive_package_dir;
        let is_archived = tokio::fs::try_exists(archived)
            .await
            .map_err(PipelineError::io("Failed to inspect", archived))?;
        if is_archived {
            info!(path = %archived.display(), "Package already archived");
            return Ok(StepStatus::Skipped(SkipReason::AlreadyArchived));
        }
        Ok(StepStatus::Done)
    }
}
