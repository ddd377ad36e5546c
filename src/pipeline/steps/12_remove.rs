use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{BuildStep, SkipReason, StepContext, StepStatus};
use async_trait::async_trait;

pub struct RemoveStep;

#[async_trait]
impl BuildStep for RemoveStep {
    fn name(&self) -> &'static str {
        "remove"
    }

    fn title(&self) -> &'static str {
        "Removing container"
    }

    fn description(&self) -> &'static [&'static str] {
        &["Removes the build container.", "Skipped if it does not exist."]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        let container = &ctx.names.container;
        if !ctx.env.container_exists(container).await? {
            return Ok(StepStatus::Skipped(SkipReason::Satisfied));
        }

        ctx.env.remove_container(container).await?;
        Ok(StepStatus::Done)
    }
}
