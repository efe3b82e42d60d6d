//! Progress indicators for long-running scan phases.
//!
//! Listing a large Drive takes a while (one request per thousand items), and so
//! can resolving the paths of thousands of shared items. The indicators here wrap
//! `indicatif` with gdscan styling and can be disabled wholesale: with
//! `--no-progress`, with `--quiet`, or when stderr is not a terminal, every
//! indicator is hidden and all calls become no-ops.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gdscan::utils::progress::ProgressBar;
//!
//! let spinner = ProgressBar::new_spinner(true);
//! spinner.set_prefix("Listing");
//! spinner.set_message("1100 files");
//! spinner.finish_and_clear();
//! ```

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

/// Whether indicators should be drawn, given the user's preference.
pub fn progress_enabled(requested: bool) -> bool {
    requested && std::io::stderr().is_terminal()
}

/// A progress bar or spinner with consistent styling.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Create a bar for `len` steps; hidden unless `enabled`.
    pub fn new(len: u64, enabled: bool) -> Self {
        let bar = if enabled {
            let bar = IndicatifBar::new(len);
            bar.set_style(default_style());
            bar
        } else {
            IndicatifBar::hidden()
        };
        Self {
            inner: bar,
        }
    }

    /// Create a spinner for work of unknown size; hidden unless `enabled`.
    pub fn new_spinner(enabled: bool) -> Self {
        let bar = if enabled {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            IndicatifBar::hidden()
        };
        Self {
            inner: bar,
        }
    }

    /// A hidden indicator, for library callers and tests.
    pub fn hidden() -> Self {
        Self {
            inner: IndicatifBar::hidden(),
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Complete the indicator and remove it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn default_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{prefix:.bold} {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}
