// UI layer: console progress, spinners around network calls and
// `dialoguer` prompts for identity values nobody configured.

use anyhow::{Context, Result};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::config::IdentityKey;

/// Start a spinner on stderr. Hidden when stderr is not a terminal, and
/// when info-level logs are on so log lines and the spinner never share
/// the screen. Callers clear it with `finish_and_clear` once the call returns.
pub fn spinner(message: &'static str) -> ProgressBar {
    if tracing::enabled!(tracing::Level::INFO) {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print a console line while `progress` may be drawing: the spinner is
/// wiped, the line printed, then the spinner redrawn below it.
pub fn print_above(progress: &ProgressBar, line: &str) {
    progress.suspend(|| println!("{}", line));
}

/// Ask for one identity value.
pub fn prompt_for(key: IdentityKey) -> Result<String> {
    Input::<String>::new()
        .with_prompt(key.label())
        .interact_text()
        .with_context(|| format!("Failed to read {} from the terminal", key))
}

/// Token status line. The token itself is never shown.
pub fn token_status(token: Option<&str>) -> &'static str {
    if token.is_some() {
        "[RECEIVED]"
    } else {
        "[NULL]"
    }
}
