//! One error-reporting path shared by every request.

use std::fmt::Display;

/// Where a reported line is written in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// The most-recent-first response area.
    Response,
    /// The summary output field (replaced, not appended).
    Summary,
    /// The status line beside the link field.
    LinkStatus,
}

/// Log a failure under `context` and return the line to show the user.
pub fn error_line(context: &str, message: impl Display) -> String {
    tracing::error!(context, "{}", message);
    format!("Error: {}", message)
}

/// Log a success under `context` and return the line to show the user.
pub fn info_line(context: &str, message: impl Display) -> String {
    tracing::info!(context, "{}", message);
    message.to_string()
}
