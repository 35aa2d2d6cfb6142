//! Progress reporting for bulk downloads.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Receives count-based progress from the bulk downloader.
///
/// `advance` is called once per finished download, from the task that awaits the
/// worker pool, never from the workers themselves.
pub trait DownloadProgress: Send + Sync {
    /// Called once before any download starts.
    fn start(&self, _total: u64) {}

    /// Called after `path` has been written.
    fn advance(&self, path: &Path);

    /// Called once after every download succeeded.
    fn finish(&self) {}

    /// Called instead of `finish` when a failed download aborts the batch.
    fn abandon(&self) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl DownloadProgress for NoProgress {
    fn advance(&self, _path: &Path) {}
}

/// Terminal progress bar.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadProgress for BarProgress {
    fn start(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn advance(&self, path: &Path) {
        if let Some(name) = path.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }

    fn abandon(&self) {
        self.bar.abandon_with_message("aborted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_stops_when_abandoned() {
        let progress = BarProgress::new();
        progress.start(3);
        progress.advance(Path::new("/data/kl/tageswerte_KL_00044_akt.zip"));
        progress.abandon();

        assert!(progress.bar.is_finished());
        assert_eq!(progress.bar.position(), 1);
        assert_eq!(progress.bar.length(), Some(3));
    }
}
