use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{argv, BuildStep, StepContext, StepStatus};
use async_trait::async_trait;

pub struct UpdateStep;

#[async_trait]
impl BuildStep for UpdateStep {
    fn name(&self) -> &'static str {
        "update"
    }

    fn title(&self) -> &'static str {
        "Updating cache"
    }

    fn description(&self) -> &'static [&'static str] {
        &["Updates the apt package cache inside the container."]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        ctx.exec(&argv(&["sudo", "apt-get", "update"])).await?;
        Ok(StepStatus::Done)
    }
}
