//! Progress handler trait and events

use crate::pipeline::StepStatus;
use std::time::Duration;

/// Events emitted while the pipeline runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Pipeline started for a package
    PipelineStarted {
        source: String,
        version: String,
        distribution: String,
        steps: usize,
    },

    /// A step is about to run
    StepStarted {
        step: &'static str,
        title: &'static str,
    },

    /// A step finished without error
    StepFinished {
        step: &'static str,
        title: &'static str,
        status: StepStatus,
        duration: Duration,
    },

    /// A step failed; no further step runs
    StepFailed {
        step: &'static str,
        title: &'static str,
        error: String,
    },

    /// A step ended the run early and successfully
    PipelineHalted { step: &'static str },

    /// Every selected step finished
    PipelineCompleted {
        steps_run: usize,
        total_time: Duration,
    },
}

/// Output sink handed to the pipeline
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        handler.on_progress(&ProgressEvent::StepStarted {
            step: "build",
            title: "Building image",
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::StepStarted {
            step: "start",
            title: "Starting container",
        });
        handler.on_progress(&ProgressEvent::StepFinished {
            step: "start",
            title: "Starting container",
            status: StepStatus::Done,
            duration: Duration::from_millis(50),
        });
        handler.on_progress(&ProgressEvent::PipelineCompleted {
            steps_run: 1,
            total_time: Duration::from_secs(5),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::PipelineHalted { step: "check" };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("PipelineHalted"));
        assert!(debug_str.contains("check"));
    }
}
