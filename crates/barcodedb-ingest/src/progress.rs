//! Progress indicator for dump staging

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Spinner counting dump rows, drawn on stderr
///
/// indicatif hides it automatically when stderr is not a terminal.
pub fn create_row_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}: {human_pos} rows ({per_sec})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
