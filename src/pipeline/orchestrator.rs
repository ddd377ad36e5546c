use super::error::PipelineError;
use super::selection::StepSelection;
use super::step::{BuildStep, StepContext, StepStatus};
use super::steps::catalogue;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use std::time::Instant;
use tracing::{debug, info};

/// Status reported by one step of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: &'static str,
    pub status: StepStatus,
}

/// Summary of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Steps that ran, in execution order
    pub outcomes: Vec<StepOutcome>,

    /// Step that ended the run early, if any
    pub halted_by: Option<&'static str>,
}

impl PipelineReport {
    pub fn status_of(&self, step: &str) -> Option<StepStatus> {
        self.outcomes
            .iter()
            .find(|o| o.step == step)
            .map(|o| o.status)
    }

    pub fn steps_run(&self) -> Vec<&'static str> {
        self.outcomes.iter().map(|o| o.step).collect()
    }

    pub fn done_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_done()).count()
    }
}

/// Runs the selected steps of the catalogue in canonical order, stopping at
/// the first failure.
///
/// There is no rollback and no retry: a failed run leaves the environment as
/// the failing step left it, and re-running relies on every step skipping
/// work that is already done.
pub struct StepPipeline {
    steps: Vec<Box<dyn BuildStep>>,
    progress_handler: Box<dyn ProgressHandler>,
}

impl StepPipeline {
    pub fn new(progress_handler: Box<dyn ProgressHandler>) -> Self {
        Self::with_steps(catalogue(), progress_handler)
    }

    /// Pipeline over a custom step list, order preserved
    pub fn with_steps(
        steps: Vec<Box<dyn BuildStep>>,
        progress_handler: Box<dyn ProgressHandler>,
    ) -> Self {
        Self {
            steps,
            progress_handler,
        }
    }

    pub fn steps(&self) -> &[Box<dyn BuildStep>] {
        &self.steps
    }

    pub async fn run(
        &self,
        selection: &StepSelection,
        ctx: &StepContext<'_>,
    ) -> Result<PipelineReport, PipelineError> {
        let start = Instant::now();
        let selected = selection.apply(&self.steps);
        let mut report = PipelineReport::default();

        self.progress_handler
            .on_progress(&ProgressEvent::PipelineStarted {
                source: ctx.metadata.source_name.clone(),
                version: ctx.metadata.package_version.clone(),
                distribution: ctx.metadata.target_distribution.clone(),
                steps: selected.len(),
            });

        for step in selected {
            let name = step.name();
            self.progress_handler.on_progress(&ProgressEvent::StepStarted {
                step: name,
                title: step.title(),
            });

            let step_start = Instant::now();
            let status = match step.run(ctx).await {
                Ok(status) => status,
                Err(error) => {
                    self.progress_handler.on_progress(&ProgressEvent::StepFailed {
                        step: name,
                        title: step.title(),
                        error: error.to_string(),
                    });
                    return Err(error);
                }
            };

            self.progress_handler.on_progress(&ProgressEvent::StepFinished {
                step: name,
                title: step.title(),
                status,
                duration: step_start.elapsed(),
            });
            debug!(step = name, status = ?status, "Step complete");
            report.outcomes.push(StepOutcome { step: name, status });

            if status.halts_pipeline() {
                self.progress_handler
                    .on_progress(&ProgressEvent::PipelineHalted { step: name });
                report.halted_by = Some(name);
                return Ok(report);
            }
        }

        info!(done = report.done_count(), "Pipeline finished");
        self.progress_handler
            .on_progress(&ProgressEvent::PipelineCompleted {
                steps_run: report.outcomes.len(),
                total_time: start.elapsed(),
            });

        Ok(report)
    }
}

impl Default for StepPipeline {
    fn default() -> Self {
        Self::new(Box::new(NoOpHandler))
    }
}
