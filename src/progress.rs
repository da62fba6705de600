//! Progress reporting.
//!
//! Long-running fetches report through the [`Progress`] trait so the
//! terminal progress bar can be swapped for a no-op in quiet mode and tests.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Observer for sequential work with a known number of steps.
pub trait Progress: Send {
    /// Begin tracking `len` steps.
    fn start(&mut self, len: u64);

    /// One step completed.
    fn advance(&mut self);

    /// All steps completed.
    fn finish(&mut self);
}

/// Progress observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&mut self, _len: u64) {}
    fn advance(&mut self) {}
    fn finish(&mut self) {}
}

/// Terminal progress bar on stderr.
#[derive(Debug)]
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    /// Create a bar labelled with `message`. Hidden when `quiet` is set.
    pub fn new(message: &str, quiet: bool) -> Self {
        let bar = ProgressBar::new(0);
        if quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(message.to_string());
        Self { bar }
    }
}

impl Progress for ConsoleProgress {
    fn start(&mut self, len: u64) {
        self.bar.set_length(len);
        self.bar.set_position(0);
    }

    fn advance(&mut self) {
        self.bar.inc(1);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}

/// Whether commands draw progress bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressMode {
    /// Draw bars on stderr.
    #[default]
    Console,
    /// Report nothing.
    Hidden,
}

impl ProgressMode {
    /// New observer for one phase of work labelled `message`.
    pub fn bar(self, message: &str) -> Box<dyn Progress> {
        match self {
            ProgressMode::Console => Box::new(ConsoleProgress::new(message, false)),
            ProgressMode::Hidden => Box::new(NoProgress),
        }
    }
}
