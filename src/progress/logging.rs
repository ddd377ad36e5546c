//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::PipelineStarted {
                source,
                version,
                distribution,
                steps,
            } => {
                info!(
                    source = %source,
                    version = %version,
                    distribution = %distribution,
                    steps,
                    "Starting pipeline"
                );
            }
            ProgressEvent::StepStarted { step, title } => {
                debug!(step, "{}", title);
            }
            ProgressEvent::StepFinished {
                step,
                status,
                duration,
                ..
            } => {
                info!(
                    step,
                    status = %status,
                    duration_ms = duration.as_millis(),
                    "Step finished"
                );
            }
            ProgressEvent::StepFailed { step, error, .. } => {
                error!(step, error = %error, "Step failed");
            }
            ProgressEvent::PipelineHalted { step } => {
                info!(step, "Nothing left to do");
            }
            ProgressEvent::PipelineCompleted {
                steps_run,
                total_time,
            } => {
                info!(
                    steps = steps_run,
                    total_time_ms = total_time.as_millis(),
                    "Pipeline complete"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{SkipReason, StepStatus};
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::PipelineStarted {
                source: "foo".to_string(),
                version: "1.0-1".to_string(),
                distribution: "bullseye".to_string(),
                steps: 13,
            },
            ProgressEvent::StepStarted {
                step: "build",
                title: "Building image",
            },
            ProgressEvent::StepFinished {
                step: "build",
                title: "Building image",
                status: StepStatus::Done,
                duration: Duration::from_millis(10),
            },
            ProgressEvent::StepFinished {
                step: "create",
                title: "Creating container",
                status: StepStatus::Skipped(SkipReason::Satisfied),
                duration: Duration::from_millis(10),
            },
            ProgressEvent::StepFailed {
                step: "package",
                title: "Packaging software",
                error: "Test error".to_string(),
            },
            ProgressEvent::PipelineHalted { step: "check" },
            ProgressEvent::PipelineCompleted {
                steps_run: 3,
                total_time: Duration::from_secs(5),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
