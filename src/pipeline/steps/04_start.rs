use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{BuildStep, SkipReason, StepContext, StepStatus};
use async_trait::async_trait;

pub struct StartStep;

#[async_trait]
impl BuildStep for StartStep {
    fn name(&self) -> &'static str {
        "start"
    }

    fn title(&self) -> &'static str {
        "Starting container"
    }

    fn description(&self) -> &'static [&'static str] {
        &["Starts the build container.", "Skipped if it is already running."]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        let container = &ctx.names.container;
        if ctx.env.container_is_running(container).await? {
            return Ok(StepStatus::Skipped(SkipReason::Satisfied));
        }

        ctx.env.start_container(container).await?;
        Ok(StepStatus::Done)
    }
}
