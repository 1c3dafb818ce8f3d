//! Progress bars shared by the workers of one downloader.
//!
//! Unlike a one-shot batch, the downloader has no known number of tasks up
//! front: the main bar's length grows on every submission and its position
//! moves on every finished task.

use crate::progress::StyleOptions;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

/// Progress display manager that coordinates multiple progress bars.
#[derive(Debug)]
pub struct ProgressDisplay {
    multi: MultiProgress,
    main: ProgressBar,
    style_options: StyleOptions,
}

impl ProgressDisplay {
    /// Create a new progress display manager.
    pub fn new(style_options: StyleOptions) -> Self {
        let multi = match style_options.is_enabled() {
            true => MultiProgress::new(),
            false => MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        };

        let main = multi.add(style_options.main().clone().to_progress_bar(0));

        Self {
            multi,
            main,
            style_options,
        }
    }

    /// Account for a newly submitted task.
    pub fn task_queued(&self) {
        self.main.inc_length(1);
    }

    /// Create a child progress bar for one running download.
    pub fn create_child_progress(&self, size: u64) -> ProgressBar {
        self.multi
            .add(self.style_options.child().clone().to_progress_bar(size))
    }

    /// Finish a child progress bar based on configuration.
    pub fn finish_child(&self, pb: ProgressBar) {
        if self.style_options.child().clear {
            pb.finish_and_clear();
        } else {
            pb.finish();
        }
    }

    /// Increment the main progress bar by one.
    pub fn increment_main(&self) {
        self.main.inc(1);
    }

    /// Number of finished and submitted tasks.
    pub fn counts(&self) -> (u64, u64) {
        (self.main.position(), self.main.length().unwrap_or(0))
    }

    /// Finish the main bar, clearing or keeping it based on configuration.
    pub fn finish(&self) {
        if self.style_options.main().clear {
            self.main.finish_and_clear();
        } else {
            self.main.finish();
        }
    }
}
