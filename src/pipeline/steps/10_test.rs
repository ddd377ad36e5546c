use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{argv, BuildStep, StepContext, StepStatus};
use async_trait::async_trait;

pub struct TestStep;

#[async_trait]
impl BuildStep for TestStep {
    fn name(&self) -> &'static str {
        "test"
    }

    fn title(&self) -> &'static str {
        "Testing package"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Lists the built packages' contents with debc,",
            "installs them with debi and checks them with lintian.",
            "Lintian flags come from DEBER_LINTIAN_FLAGS (default: -i).",
        ]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        ctx.exec(&argv(&["debc"])).await?;
        ctx.exec(&argv(&["sudo", "debi", "--with-depends", "--tool", "apty"]))
            .await?;
        ctx.exec(&ctx.config.lint_command()).await?;
        Ok(StepStatus::Done)
    }
}
