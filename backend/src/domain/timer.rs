//! Countdown timer backing the `timer` subscription.
//!
//! Each call to [`TimerService::start`] spawns one producer task that pushes
//! [`TimerSnapshot`]s into a bounded channel and hands the receiving half to
//! the caller as a [`TimerStream`]. Dropping the stream closes the channel;
//! the producer observes the closure between ticks and exits, so an abandoned
//! subscription never leaves a sleeping timer behind.
//!
//! Sequence for `seconds = n`: `{n, RUNNING}`, `{n - 1, RUNNING}`, ...,
//! `{1, RUNNING}`, `{0, DONE}`, with one tick of suspension after every
//! running snapshot.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use super::TraceId;

/// Wall-clock suspension between two running snapshots.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Largest countdown accepted unless configured otherwise.
pub const DEFAULT_MAX_SECONDS: u32 = 3600;

/// The producer runs at most one snapshot ahead of its consumer.
const SNAPSHOT_BUFFER: usize = 1;

/// Lifecycle state reported in every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerStatus {
    /// The countdown still has time remaining.
    Running,
    /// Terminal state; emitted exactly once.
    Done,
}

impl TimerStatus {
    /// GraphQL enum value name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Done => "DONE",
        }
    }
}

/// One element of a countdown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Whole seconds left before the countdown completes.
    pub remaining_time: u32,
    /// Running or done.
    pub status: TimerStatus,
}

impl TimerSnapshot {
    /// Snapshot emitted while `remaining_time` seconds are left.
    #[must_use]
    pub const fn running(remaining_time: u32) -> Self {
        Self {
            remaining_time,
            status: TimerStatus::Running,
        }
    }

    /// Terminal snapshot.
    #[must_use]
    pub const fn done() -> Self {
        Self {
            remaining_time: 0,
            status: TimerStatus::Done,
        }
    }
}

/// Reasons a countdown request is refused before any snapshot is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// Negative durations are rejected rather than treated as zero.
    #[error("seconds must not be negative (got {0})")]
    Negative(i64),
    /// The requested duration exceeds the configured cap.
    #[error("seconds must not exceed {max} (got {requested})")]
    TooLong {
        /// Requested duration.
        requested: i64,
        /// Configured cap.
        max: u32,
    },
}

/// Starts countdowns and keeps track of live producers.
///
/// Cloning is cheap; clones share the active-producer counter.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use futures_util::StreamExt;
/// use hello_timer::domain::{TimerService, TimerSnapshot};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let timers = TimerService::new(Duration::from_millis(1), 10);
/// let snapshots: Vec<_> = timers.start(1).expect("valid").collect().await;
/// assert_eq!(snapshots, vec![TimerSnapshot::running(1), TimerSnapshot::done()]);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct TimerService {
    tick: Duration,
    max_seconds: u32,
    active: Arc<AtomicUsize>,
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new(DEFAULT_TICK, DEFAULT_MAX_SECONDS)
    }
}

impl TimerService {
    /// Create a service suspending `tick` between snapshots and refusing
    /// countdowns longer than `max_seconds`.
    #[must_use]
    pub fn new(tick: Duration, max_seconds: u32) -> Self {
        Self {
            tick,
            max_seconds,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configured countdown cap.
    #[must_use]
    pub const fn max_seconds(&self) -> u32 {
        self.max_seconds
    }

    /// Number of producer tasks currently alive.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Check a requested duration against the accepted range.
    pub fn validate(&self, seconds: i64) -> Result<u32, TimerError> {
        if seconds < 0 {
            return Err(TimerError::Negative(seconds));
        }
        match u32::try_from(seconds) {
            Ok(value) if value <= self.max_seconds => Ok(value),
            _ => Err(TimerError::TooLong {
                requested: seconds,
                max: self.max_seconds,
            }),
        }
    }

    /// Start a countdown of `seconds` and return its snapshot stream.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, seconds: i64) -> Result<TimerStream, TimerError> {
        let seconds = self.validate(seconds)?;
        let (sender, receiver) = mpsc::channel(SNAPSHOT_BUFFER);
        let producer = run_countdown(
            seconds,
            self.tick,
            sender,
            ActiveTimer::acquire(Arc::clone(&self.active)),
        );

        TraceId::spawn(producer);

        Ok(TimerStream { receiver })
    }
}

/// Receiving half of one countdown. Dropping it cancels the producer.
#[derive(Debug)]
pub struct TimerStream {
    receiver: mpsc::Receiver<TimerSnapshot>,
}

impl Stream for TimerStream {
    type Item = TimerSnapshot;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

/// Keeps the active-producer count accurate however the task ends.
struct ActiveTimer(Arc<AtomicUsize>);

impl ActiveTimer {
    fn acquire(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for ActiveTimer {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

async fn run_countdown(
    seconds: u32,
    tick: Duration,
    sender: mpsc::Sender<TimerSnapshot>,
    _active: ActiveTimer,
) {
    debug!(seconds, "countdown started");
    for elapsed in 0..seconds {
        let remaining = seconds - elapsed;
        if sender.send(TimerSnapshot::running(remaining)).await.is_err() {
            debug!(remaining, "countdown consumer dropped; stopping");
            return;
        }
        tokio::select! {
            () = sender.closed() => {
                debug!(remaining, "countdown cancelled between ticks");
                return;
            }
            () = tokio::time::sleep(tick) => {}
        }
    }
    if sender.send(TimerSnapshot::done()).await.is_err() {
        debug!("countdown consumer dropped before completion");
        return;
    }
    debug!(seconds, "countdown finished");
}
