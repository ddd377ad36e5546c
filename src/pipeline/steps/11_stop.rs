use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{BuildStep, SkipReason, StepContext, StepStatus};
use async_trait::async_trait;

pub struct StopStep;

#[async_trait]
impl BuildStep for StopStep {
    fn name(&self) -> &'static str {
        "stop"
    }

    fn title(&self) -> &'static str {
        "Stopping container"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Stops the build container.",
            "Waits at most DEBER_STOP_TIMEOUT seconds (default: 10).",
        ]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        let container = &ctx.names.container;
        if ctx.env.container_is_stopped(container).await? {
            return Ok(StepStatus::Skipped(SkipReason::Satisfied));
        }

        ctx.env.stop_container(container).await?;
        Ok(StepStatus::Done)
    }
}
