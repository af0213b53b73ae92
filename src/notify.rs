//! User-facing notification sink.
//!
//! Controllers receive a [`Notify`] implementation instead of printing
//! directly, so the state machines stay testable without any terminal.
//! Verbose details belong in `tracing` logs, not here.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Capability for surfacing human-readable outcome messages.
pub trait Notify: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
}

/// Terminal notifier used by the CLI.
///
/// While an operation is in flight a spinner is shown; the next
/// success or error finishes it in place. Only one spinner is active
/// at a time (newest wins).
pub struct ConsoleNotifier {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    /// Starts a spinner for an in-flight operation.
    pub fn begin(&self, message: &str) {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Some(previous) = self.replace(Some(pb)) {
            previous.finish_and_clear();
        }
    }

    fn replace(&self, next: Option<ProgressBar>) -> Option<ProgressBar> {
        let mut guard = match self.spinner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }

    fn finish(&self, line: String) {
        match self.replace(None) {
            Some(pb) => pb.finish_with_message(line),
            None => println!("{line}"),
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notify for ConsoleNotifier {
    fn success(&self, message: &str) {
        self.finish(format!("{} {}", style("✓").green().bold(), message));
    }

    fn error(&self, message: &str) {
        self.finish(format!("{} {}", style("✗").red().bold(), message));
    }

    fn info(&self, message: &str) {
        self.finish(format!("{} {}", style("•").cyan(), message));
    }
}
