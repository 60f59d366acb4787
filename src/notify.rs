//! Completion notifications

use std::process::Command;

use tracing::{debug, warn};

/// Text used when the timer was started without a label.
pub const DEFAULT_LABEL: &str = "break";

/// Something that can put a message in front of the user.
pub trait Notifier {
    /// Best-effort: failures are the implementation's to report.
    fn notify(&self, text: &str);
}

/// The notification text for an optional label.
pub fn completion_text(label: Option<&str>) -> &str {
    label.unwrap_or(DEFAULT_LABEL)
}

/// Runs an external notification program (normally `notify-send`) with the
/// text as its only argument.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
}

impl CommandNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, text: &str) {
        debug!(program = %self.program, text, "sending notification");
        match Command::new(&self.program).arg(text).status() {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(program = %self.program, %status, "notification command failed"),
            Err(e) => warn!(program = %self.program, error = %e, "could not run notification command"),
        }
    }
}
