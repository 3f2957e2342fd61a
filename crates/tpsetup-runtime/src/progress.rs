//! Progress reporting for long-running provisioning steps.
//!
//! Downloads and toolchain runs report through [`ProgressReporter`] so the
//! CLI can draw terminal bars while tests and library callers stay silent.
//!
//! # Feature Flags
//!
//! - `cli`: Enables `CliProgress`, which draws `indicatif` bars and spinners.
//!   Without this feature, only `NoopProgress` is available.

/// Receives progress updates during a download or build.
pub trait ProgressReporter: Send + Sync {
    /// Called when an operation starts; `total` is the byte count if known.
    fn start(&self, message: &str, total: Option<u64>);

    /// Called as bytes arrive. `total` may be discovered after `start`.
    fn update(&self, current: u64, total: Option<u64>);

    /// Log a line without disturbing an active bar.
    fn message(&self, msg: &str);

    fn finish(&self, message: &str);

    fn finish_with_error(&self, message: &str);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _message: &str, _total: Option<u64>) {}
    fn update(&self, _current: u64, _total: Option<u64>) {}
    fn message(&self, _msg: &str) {}
    fn finish(&self, _message: &str) {}
    fn finish_with_error(&self, _message: &str) {}
}

/// Terminal progress reporter, only available with the `cli` feature.
#[cfg(feature = "cli")]
pub mod cli_progress {
    use super::ProgressReporter;
    use indicatif::{ProgressBar, ProgressStyle};
    use std::sync::Mutex;

    const DOWNLOAD_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}";
    const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

    /// Draws a byte bar when the size is known and a spinner otherwise.
    pub struct CliProgress {
        bar: Mutex<Option<ProgressBar>>,
    }

    impl CliProgress {
        pub const fn new() -> Self {
            Self {
                bar: Mutex::new(None),
            }
        }

        fn create_download_bar(total: u64) -> ProgressBar {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::with_template(DOWNLOAD_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░");
            pb.set_style(style);
            pb
        }

        fn create_spinner() -> ProgressBar {
            let pb = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            pb.set_style(style);
            pb
        }
    }

    impl Default for CliProgress {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ProgressReporter for CliProgress {
        fn start(&self, message: &str, total: Option<u64>) {
            let pb = match total {
                Some(t) if t > 0 => Self::create_download_bar(t),
                _ => Self::create_spinner(),
            };
            pb.set_message(message.to_string());

            if let Ok(mut guard) = self.bar.lock() {
                *guard = Some(pb);
            }
        }

        fn update(&self, current: u64, total: Option<u64>) {
            if let Ok(guard) = self.bar.lock() {
                if let Some(ref pb) = *guard {
                    if let Some(t) = total {
                        pb.set_length(t);
                    }
                    pb.set_position(current);
                }
            }
        }

        fn message(&self, msg: &str) {
            match self.bar.lock() {
                Ok(guard) if guard.is_some() => {
                    if let Some(ref pb) = *guard {
                        pb.println(msg);
                    }
                }
                _ => eprintln!("{msg}"),
            }
        }

        fn finish(&self, message: &str) {
            if let Ok(mut guard) = self.bar.lock() {
                if let Some(pb) = guard.take() {
                    pb.finish_with_message(message.to_string());
                }
            }
        }

        fn finish_with_error(&self, message: &str) {
            if let Ok(mut guard) = self.bar.lock() {
                if let Some(pb) = guard.take() {
                    pb.abandon_with_message(message.to_string());
                }
            }
        }
    }
}

#[cfg(feature = "cli")]
pub use cli_progress::CliProgress;
