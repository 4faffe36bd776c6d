//! Progress bar utilities for transfer operations
//!
//! Provides consistent progress indication for uploads and downloads.

use super::OutputConfig;

/// Progress bar wrapper
///
/// Handles progress display based on output configuration.
/// In quiet or JSON mode, progress is suppressed.
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

fn hidden(config: &OutputConfig) -> bool {
    config.quiet || config.json || config.no_progress
}

impl ProgressBar {
    /// Create a new progress bar with the given total size
    pub fn new(config: &OutputConfig, total: u64) -> Self {
        let bar = if hidden(config) {
            None
        } else {
            let bar = indicatif::ProgressBar::new(total);
            let style = indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("#>-");
            bar.set_style(style);
            Some(bar)
        };

        Self { bar }
    }

    /// Create a spinner for transfers whose progress is not observable
    pub fn spinner(config: &OutputConfig, message: &str) -> Self {
        let bar = if hidden(config) {
            None
        } else {
            let bar = indicatif::ProgressBar::new_spinner();
            let style = indicatif::ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner());
            bar.set_style(style);
            bar.set_message(message.to_string());
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(bar)
        };

        Self { bar }
    }

    /// Update progress
    pub fn set_position(&self, pos: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(pos);
        }
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Check if progress bar is visible
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}
