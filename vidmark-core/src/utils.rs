//! Small formatting utilities shared with the CLI.

use std::time::Duration;

/// Formats a duration as "XhYmZs" (e.g., 3661s -> "1h 1m 1s").
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours}h {minutes}m {secs}s")
}
