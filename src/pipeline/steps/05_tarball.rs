use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{BuildStep, SkipReason, StepContext, StepStatus};
use async_trait::async_trait;
use tracing::debug;

pub struct TarballStep;

#[async_trait]
impl BuildStep for TarballStep {
    fn name(&self) -> &'static str {
        "tarball"
    }

    fn title(&self) -> &'static str {
        "Moving tarball"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Moves the upstream tarball from the source parent directory",
            "into the build directory.",
            "Skipped for native packages or when the tarball was already moved.",
        ]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        let file_name = &ctx.metadata.tarball_file_name;
        if file_name.is_empty() {
            return Ok(StepStatus::Skipped(SkipReason::NotApplicable));
        }

        let source = ctx.names.source_parent_dir.join(file_name);
        let target = ctx.names.build_dir.join(file_name);

        if !source.exists() && target.exists() {
            debug!(target = %target.display(), "Tarball already in build directory");
            return Ok(StepStatus::Skipped(SkipReason::Satisfied));
        }

        tokio::fs::create_dir_all(&ctx.names.build_dir)
            .await
            .map_err(PipelineError::io("Failed to create", &ctx.names.build_dir))?;
        tokio::fs::rename(&source, &target)
            .await
            .map_err(PipelineError::io("Failed to move", &source))?;

        Ok(StepStatus::Done)
    }
}
