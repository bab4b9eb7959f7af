use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// StderrProgressReporter adapter for reporting progress to stderr
///
/// This adapter implements the ProgressReporter port, writing progress
/// information to stderr so it doesn't interfere with stdout output.
/// Uses an indicatif spinner while the concurrent fetches are in flight.
pub struct StderrProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(bar) = spinner.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn start_spinner(&self, message: &str) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("   {spinner:.green} {msg}")
                .expect("Failed to set spinner template"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(bar);
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        self.clear_spinner();
        eprintln!("{}", message);

        // Fetch messages are followed by a wait on the external tool; keep
        // the terminal alive with a spinner until the next report.
        if message.contains("Fetching") || message.contains("Querying") {
            self.start_spinner("waiting for external tools...");
        }
    }

    fn report_error(&self, message: &str) {
        self.clear_spinner();
        eprintln!("{}", message);
    }

    fn report_completion(&self, message: &str) {
        self.clear_spinner();
        eprintln!();
        eprintln!("{}", message);
    }
}
