use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{BuildStep, SkipReason, StepContext, StepStatus};
use async_trait::async_trait;

pub struct CreateStep;

#[async_trait]
impl BuildStep for CreateStep {
    fn name(&self) -> &'static str {
        "create"
    }

    fn title(&self) -> &'static str {
        "Creating container"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Creates the build container from the image.",
            "Mounts the source, build and archive directories.",
            "Skipped if the container already exists.",
        ]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        // Bind mount sources must exist on the host
        for dir in [&ctx.names.build_dir, &ctx.names.archive_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(PipelineError::io("Failed to create", dir))?;
        }

        if ctx.env.container_exists(&ctx.names.container).await? {
            return Ok(StepStatus::Skipped(SkipReason::Satisfied));
        }

        ctx.env.create_container(ctx.names).await?;
        Ok(StepStatus::Done)
    }
}
