use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{BuildStep, StepContext, StepStatus};
use async_trait::async_trait;

/// Index file apt expects in the local repository
const INDEX_FILE: &str = "Packages";

pub struct PackageStep;

#[async_trait]
impl BuildStep for PackageStep {
    fn name(&self) -> &'static str {
        "package"
    }

    fn title(&self) -> &'static str {
        "Packaging software"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Builds the package with dpkg-buildpackage.",
            "Flags come from DEBER_DPKG_BUILDPACKAGE_FLAGS (default: -tc).",
        ]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        let index = ctx.names.archive_dir.join(INDEX_FILE);
        if !index.exists() {
            tokio::fs::create_dir_all(&ctx.names.archive_dir)
                .await
                .map_err(PipelineError::io("Failed to create", &ctx.names.archive_dir))?;
            tokio::fs::File::create(&index)
                .await
                .map_err(PipelineError::io("Failed to create", &index))?;
        }

        ctx.exec(&ctx.config.package_command()).await?;
        Ok(StepStatus::Done)
    }
}
