//! Human-readable progress lines on the terminal
//!
//! ```text
//! deber:info: Building image ...
//! deber:info: Building image ... done
//! ```

use super::{ProgressEvent, ProgressHandler};
use crate::naming::PROGRAM;
use crate::pipeline::StepStatus;
use console::{style, Term};
use tracing::debug;

/// Writes one line per step transition to stderr.
///
/// Step start and result go on separate lines because container commands
/// stream their own output in between.
#[derive(Debug, Clone)]
pub struct ConsoleHandler {
    term: Term,
    color: bool,
}

impl ConsoleHandler {
    pub fn new(color: bool) -> Self {
        let term = Term::stderr();
        let color = color && term.features().colors_supported();
        Self { term, color }
    }

    fn prefix(&self, kind: &str) -> String {
        let prefix = format!("{}:{}:", PROGRAM, kind);
        if !self.color {
            return prefix;
        }
        match kind {
            "error" => style(prefix).red().force_styling(true).to_string(),
            _ => style(prefix).blue().force_styling(true).to_string(),
        }
    }

    /// Renders the line for an event, `None` if the event is not shown
    pub fn render(&self, event: &ProgressEvent) -> Option<String> {
        match event {
            ProgressEvent::StepStarted { title, .. } => {
                Some(format!("{} {} ...", self.prefix("info"), title))
            }
            ProgressEvent::StepFinished { title, status, .. } => {
                let word = match status {
                    StepStatus::Done => "done",
                    StepStatus::Skipped(_) => "skipped",
                };
                Some(format!("{} {} ... {}", self.prefix("info"), title, word))
            }
            ProgressEvent::StepFailed { title, error, .. } => Some(format!(
                "{} {} ... failed: {}",
                self.prefix("error"),
                title,
                error
            )),
            ProgressEvent::PipelineHalted { .. } => Some(format!(
                "{} Package already archived, nothing to do",
                self.prefix("info")
            )),
            ProgressEvent::PipelineStarted { .. } | ProgressEvent::PipelineCompleted { .. } => None,
        }
    }
}

impl ProgressHandler for ConsoleHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        if let Some(line) = self.render(event) {
            if let Err(e) = self.term.write_line(&line) {
                debug!(error = %e, "Failed to write progress line");
            }
        }
    }
}
