use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{argv, BuildStep, StepContext, StepStatus};
use async_trait::async_trait;

/// Refreshes the local repository index so earlier builds can satisfy
/// build dependencies
pub struct ScanStep;

#[async_trait]
impl BuildStep for ScanStep {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn title(&self) -> &'static str {
        "Scanning archive"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Scans the archive directory for already built packages",
            "and writes the local repository index.",
        ]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        ctx.exec(&argv(&["scan"])).await?;
        Ok(StepStatus::Done)
    }
}
