//! Bounded retry-until-accepted polling.
//!
//! Every `wait_for_*` helper on [`Code`](crate::code::Code) is built on
//! [`poll`]: a fetch is awaited up to `retry_count` times, with a fixed sleep
//! between attempts, until its result passes an accept predicate. A failing
//! fetch counts as a rejected attempt; only running out of attempts is fatal.

use crate::error::Error;
use crate::result::Result;
use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// Default number of attempts.
pub const DEFAULT_RETRY_COUNT: u32 = 200;

/// Default pause between attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);

const REJECTED: &str = "Did not pass accept function";

/// Retry budget of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Maximum number of fetch attempts.
    pub retry_count: u32,
    /// Pause between attempts.
    pub retry_interval: Duration,
}

impl PollOptions {
    /// Options with the given budget.
    pub const fn new(retry_count: u32, retry_interval: Duration) -> Self {
        Self {
            retry_count,
            retry_interval,
        }
    }

    /// Replace the number of attempts.
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Replace the pause between attempts.
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Nominal time budget: attempts times interval.
    pub fn budget(&self) -> Duration {
        self.retry_interval * self.retry_count
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_COUNT, DEFAULT_RETRY_INTERVAL)
    }
}

/// Await `fetch` until `accept` approves a result or the budget runs out.
///
/// Returns the first accepted result. On exhaustion fails with
/// [`Error::Timeout`] naming `description`, the elapsed time, and the last
/// fetch failure.
///
/// # Examples
///
/// ```rust
/// use smoke_driver::poll::{poll, PollOptions};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> smoke_driver::Result<()> {
/// let mut calls = 0;
/// let value = poll(
///     || {
///         calls += 1;
///         let n = calls;
///         async move { Ok::<_, std::io::Error>(n) }
///     },
///     |n| *n >= 3,
///     "count to three",
///     PollOptions::new(5, Duration::ZERO),
/// )
/// .await?;
/// assert_eq!(value, 3);
/// # Ok(())
/// # }
/// ```
pub async fn poll<T, E, F, Fut, A>(
    mut fetch: F,
    mut accept: A,
    description: &str,
    options: PollOptions,
) -> Result<T>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    A: FnMut(&T) -> bool,
{
    let start = Instant::now();
    let mut last_error = String::new();

    for trial in 1..=options.retry_count {
        match fetch().await {
            Ok(result) if accept(&result) => return Ok(result),
            Ok(_) => last_error = REJECTED.to_string(),
            Err(e) => last_error = e.to_string(),
        }

        trace!(trial, description, last_error = %last_error, "poll attempt rejected");

        if trial < options.retry_count {
            tokio::time::sleep(options.retry_interval).await;
        }
    }

    let elapsed = start.elapsed();
    warn!("Timeout!");
    warn!("{}", last_error);
    warn!("Timeout: {} after {} seconds.", description, elapsed.as_secs_f64());

    Err(Error::Timeout {
        description: description.to_string(),
        elapsed,
        last_error,
    })
}
