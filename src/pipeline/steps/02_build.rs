use crate::environment::BASE_REPOSITORIES;
use crate::pipeline::error::PipelineError;
use crate::pipeline::step::{BuildStep, SkipReason, StepContext, StepStatus};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct BuildImageStep;

#[async_trait]
impl BuildStep for BuildImageStep {
    fn name(&self) -> &'static str {
        "build"
    }

    fn title(&self) -> &'static str {
        "Building image"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Builds the image for the target distribution.",
            "Skipped if the image exists and is not older than the configured max age.",
            "The base image is looked up in: debian, ubuntu.",
        ]
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepStatus, PipelineError> {
        let image = &ctx.names.image;

        if ctx.env.image_exists(image).await? && !ctx.env.image_is_stale(image).await? {
            return Ok(StepStatus::Skipped(SkipReason::Satisfied));
        }

        let dist = &ctx.metadata.target_distribution;
        for repo in BASE_REPOSITORIES {
            let tags = ctx.env.list_available_tags(repo, dist).await?;
            debug!(repo, count = tags.len(), "Searching base image tags");

            if tags.iter().any(|tag| tag == dist) {
                let base = format!("{}:{}", repo, dist);
                info!(image = %image, base = %base, "Found base image");
                ctx.env.build_image(image, &base).await?;
                return Ok(StepStatus::Done);
            }
        }

        Err(PipelineError::DistributionImageNotFound(dist.clone()))
    }
}
