use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{BuildStep, SkipReason, StepContext, StepStatus};
use async_trait::async_trait;

pub struct ArchiveStep;

#[async_trait]
impl BuildStep for ArchiveStep {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn title(&self) -> &'static str {
        "Archiving build"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Moves the build directory into the archive.",
            "Skipped if the package is already archived.",
        ]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        let target = &ctx.names.archive_package_dir;
        let archived = tokio::fs::try_exists(target)
            .await
            .map_err(PipelineError::io("Failed to inspect", target))?;
        if archived {
            return Ok(StepStatus::Skipped(SkipReason::Satisfied));
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(PipelineError::io("Failed to create", parent))?;
        }

        // Same filesystem as the build tree, so this is a single atomic rename
        tokio::fs::rename(&ctx.names.build_dir, target)
            .await
            .map_err(PipelineError::io("Failed to archive", &ctx.names.build_dir))?;

        Ok(StepStatus::Done)
    }
}
