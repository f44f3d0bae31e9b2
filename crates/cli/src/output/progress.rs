//! Upload progress bar
//!
//! Wraps the content stream so bytes are counted as the store reads them.

use dc_core::ContentReader;
use tokio::io::AsyncRead;

use super::OutputConfig;

/// Progress bar wrapper
///
/// When progress is disabled the bar is absent and readers pass through.
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a new progress bar with the given total size in bytes
    pub fn new(config: &OutputConfig, total: u64) -> Self {
        let bar = if config.no_progress {
            None
        } else {
            let bar = indicatif::ProgressBar::new(total);
            bar.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(bar)
        };

        Self { bar }
    }

    /// Wrap a reader so that reading from it advances the bar
    pub fn wrap_reader<R>(&self, reader: R) -> ContentReader
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        match &self.bar {
            Some(bar) => Box::new(bar.wrap_async_read(reader)),
            None => Box::new(reader),
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
