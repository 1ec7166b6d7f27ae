//! Progress reporting for long-running fetches
//!
//! Spinners for the CLI while the bulk animal list loads, using indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Template for spinners
pub const DEFAULT_SPINNER_TEMPLATE: &str = "{spinner:.green} {elapsed_precise} {msg}";

/// Create a spinner progress bar for operations without a known length
///
/// # Arguments
/// * `message` - Optional message to display with the spinner
#[must_use]
pub fn create_spinner(message: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(DEFAULT_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }

    if let Some(msg) = message {
        pb.set_message(msg.to_string());
    }

    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a progress bar with a completion message
///
/// # Arguments
/// * `pb` - The `ProgressBar` to finish
/// * `message` - Optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}
