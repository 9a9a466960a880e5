//! Progress reporting for batch audits using indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use raster_gate_core::{Notice, NotificationSink};

/// Notification sink that prints operator lines to stderr and drives an
/// optional progress bar.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Creates a new reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, suppress the bar and per-record lines
    /// * `show_bar` - If true, show a progress bar
    #[must_use]
    pub fn new(quiet: bool, show_bar: bool) -> Self {
        let bar = (!quiet && show_bar).then(|| {
            let bar = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });

        Self { bar, quiet }
    }

    fn print(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }
}

impl NotificationSink for ProgressReporter {
    fn on_notice(&self, notice: Notice) {
        match &notice {
            Notice::Started { total } => {
                if let Some(bar) = &self.bar {
                    bar.set_length(u64::try_from(*total).unwrap_or(u64::MAX));
                }
            }
            Notice::Completed { .. } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
            }
            Notice::RuleFailed { .. } | Notice::FileMissing { .. } => {
                if !self.quiet {
                    if let Some(line) = notice.message() {
                        self.print(&line);
                    }
                }
            }
            Notice::Summary { .. } => {
                if let Some(bar) = &self.bar {
                    bar.finish_and_clear();
                }
                if let Some(line) = notice.message() {
                    eprintln!("{line}");
                }
            }
            Notice::PageFetched { .. } => {}
        }
    }
}
