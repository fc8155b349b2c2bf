//! Progress reporting for chat builds.
//!
//! Building a chat from a large export can take a while. A
//! [`ProgressReporter`] passed to
//! [`ChatBuilder::with_progress`](crate::chat::ChatBuilder::with_progress) is
//! told when the build starts, after every message and when it finishes.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! use chatdemux::chat::ChatBuilder;
//! use chatdemux::progress::{IntervalProgressReporter, Progress, ProgressCallback};
//! use chatdemux::RawEvent;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let callback: ProgressCallback = Arc::new(move |progress: Progress| {
//!     sink.lock().unwrap().push(progress.messages_processed);
//! });
//!
//! let mut reporter = IntervalProgressReporter::new(Duration::ZERO).with_callback(callback);
//! let feed = vec![RawEvent::text("Ann", 0, "Hi"), RawEvent::text("Bob", 1, "Hey")];
//! ChatBuilder::new("Ann").with_progress(&mut reporter).build(feed)?;
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2, 2]);
//! # Ok::<(), chatdemux::DemuxError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::message::Message;

/// A snapshot of how far a build has got.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Messages built so far.
    pub messages_processed: usize,

    /// Time since the build started.
    pub elapsed: Duration,

    /// `true` for the final report of a build.
    pub finished: bool,
}

impl Progress {
    /// Creates a progress snapshot.
    pub fn new(messages_processed: usize, elapsed: Duration) -> Self {
        Self {
            messages_processed,
            elapsed,
            finished: false,
        }
    }

    /// Messages per second, or `None` before any time has passed.
    pub fn rate(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        (secs > 0.0).then(|| self.messages_processed as f64 / secs)
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that logs through `tracing`.
pub fn log_progress() -> ProgressCallback {
    Arc::new(|progress| {
        if progress.finished {
            info!(
                messages = progress.messages_processed,
                elapsed_ms = progress.elapsed.as_millis() as u64,
                "processed messages"
            );
        } else {
            info!(messages = progress.messages_processed, "messages processed");
        }
    })
}

/// Observer of a chat build.
pub trait ProgressReporter {
    /// Called once before the first event.
    fn on_start(&mut self);

    /// Called after each message is built.
    fn on_message(&mut self, message: &Message);

    /// Called once after the last message.
    fn on_finish(&mut self);
}

/// Reports the running message count at most once per interval, and a final
/// summary when the build finishes.
pub struct IntervalProgressReporter {
    interval: Duration,
    callback: ProgressCallback,
    started: Option<Instant>,
    next_report: Option<Instant>,
    messages: usize,
}

impl IntervalProgressReporter {
    /// Creates a reporter that logs through `tracing`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            callback: log_progress(),
            started: None,
            next_report: None,
            messages: 0,
        }
    }

    /// Sends reports to `callback` instead of the log.
    #[must_use]
    pub fn with_callback(mut self, callback: ProgressCallback) -> Self {
        self.callback = callback;
        self
    }

    /// Messages seen since the last `on_start`.
    pub fn messages_processed(&self) -> usize {
        self.messages
    }

    fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }
}

impl Default for IntervalProgressReporter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl ProgressReporter for IntervalProgressReporter {
    fn on_start(&mut self) {
        self.started = Some(Instant::now());
        self.next_report = None;
        self.messages = 0;
    }

    fn on_message(&mut self, _message: &Message) {
        self.messages += 1;

        let now = Instant::now();
        if self.next_report.is_none_or(|due| now >= due) {
            self.next_report = Some(now + self.interval);
            (self.callback)(Progress::new(self.messages, self.elapsed()));
        }
    }

    fn on_finish(&mut self) {
        (self.callback)(Progress {
            finished: true,
            ..Progress::new(self.messages, self.elapsed())
        });
    }
}
