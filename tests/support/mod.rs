#![allow(dead_code)]

pub mod fake_environment;
pub mod package;

pub use fake_environment::FakeEnvironment;
pub use package::{PackageBuilder, PackageFixture};

use deber::progress::{ProgressEvent, ProgressHandler};
use std::sync::{Arc, Mutex};

/// Progress handler that keeps every event for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingHandler {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressHandler for RecordingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
