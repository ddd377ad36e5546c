pub mod error;
pub mod orchestrator;
pub mod selection;
pub mod step;
pub mod steps;

pub use error::PipelineError;
pub use orchestrator::{PipelineReport, StepOutcome, StepPipeline};
pub use selection::StepSelection;
pub use step::{BuildStep, SkipReason, StepContext, StepStatus};
pub use steps::{catalogue, STEP_NAMES};
