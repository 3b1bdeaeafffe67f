//! Run a unit of work on a worker pool while showing a progress ticker.
//!
//! [`ProgressRunner::run`] is the only place stage work is awaited. It owns
//! the ticker for exactly as long as the work is in flight: the ticker is
//! told to stop and joined before the terminal ` DONE` / ` FAILED` is
//! written, so no marker can land after it.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, instrument};

use crate::console::Console;
use crate::scope::Scope;

/// Interval between progress markers.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Marker printed once per tick.
pub const PROGRESS_MARKER: &str = ".";

/// Terminal text after a successful task.
pub const DONE_SUFFIX: &str = " DONE";

/// Terminal text after a failed task.
pub const FAILED_SUFFIX: &str = " FAILED";

/// Runs work on a [`Scope`] and reports progress through a [`Console`].
#[derive(Debug, Clone)]
pub struct ProgressRunner {
    console: Console,
    tick_interval: Duration,
}

impl ProgressRunner {
    /// Creates a runner ticking every [`DEFAULT_TICK_INTERVAL`].
    #[must_use]
    pub fn new(console: Console) -> Self {
        Self {
            console,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Overrides the tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// The console this runner writes to.
    #[must_use]
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Runs `work` on `scope` and returns its value, or `None` if it failed.
    ///
    /// Unless the console is quiet, `label` is printed once, followed by one
    /// marker per tick until the work settles, then ` DONE` or ` FAILED`.
    /// Failures (including a panicking task) are logged here and never
    /// propagated; the `None` is the only signal the caller gets.
    #[instrument(level = "debug", skip(self, scope, work), fields(scope = scope.name()))]
    pub async fn run<T, E, F>(&self, scope: &Scope, label: &str, work: F) -> Option<T>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let task = scope.spawn(work);
        let ticker = (!self.console.is_quiet())
            .then(|| Ticker::start(self.console.clone(), label, self.tick_interval));

        let settled = task.await;

        if let Some(ticker) = ticker {
            ticker.stop().await;
        }

        match settled {
            Ok(Ok(value)) => {
                self.console.status_line(DONE_SUFFIX);
                debug!(task = label, "task completed");
                Some(value)
            }
            Ok(Err(cause)) => {
                self.console.status_line(FAILED_SUFFIX);
                error!(task = label, error = %cause, "task failed");
                None
            }
            Err(join_error) => {
                self.console.status_line(FAILED_SUFFIX);
                error!(task = label, error = %join_error, "task aborted");
                None
            }
        }
    }
}

/// Progress ticker bound to one in-flight task.
struct Ticker {
    done: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn start(console: Console, label: &str, tick_interval: Duration) -> Self {
        let (done, mut done_rx) = watch::channel(false);
        let label = label.to_string();

        let handle = tokio::spawn(async move {
            console.status(&label);

            let mut ticks = interval(tick_interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    // Err means the sender is gone, which also means stop.
                    _ = done_rx.changed() => break,
                    _ = ticks.tick() => console.status(PROGRESS_MARKER),
                }
            }
        });

        Self { done, handle }
    }

    /// Signals the ticker and waits until it has written its last marker.
    async fn stop(self) {
        let _ = self.done.send(true);
        if let Err(e) = self.handle.await {
            debug!(error = %e, "progress ticker ended abnormally");
        }
    }
}
