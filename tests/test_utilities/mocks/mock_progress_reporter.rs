use attest_graph::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock ProgressReporter for testing that captures messages
///
/// Cloneable so a test can hand one clone to the use case and keep another
/// for assertions.
#[derive(Clone)]
pub struct MockProgressReporter {
    messages: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            errors: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Default for MockProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn report_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn report_completion(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
