use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{argv, BuildStep, StepContext, StepStatus};
use async_trait::async_trait;

pub struct DepsStep;

#[async_trait]
impl BuildStep for DepsStep {
    fn name(&self) -> &'static str {
        "deps"
    }

    fn title(&self) -> &'static str {
        "Installing dependencies"
    }

    fn description(&self) -> &'static [&'static str] {
        &["Installs the package's build dependencies with mk-build-deps."]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        ctx.exec(&argv(&["sudo", "mk-build-deps", "-ri", "-t", "apty"]))
            .await?;
        Ok(StepStatus::Done)
    }
}
