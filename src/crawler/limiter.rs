//! Global fetch-rate limiter
//!
//! The limiter is shared by every worker and caps the number of fetches admitted in any
//! window of `period` to `limit`. It is a burst-then-pause throttle: up to `limit`
//! admissions are granted back to back, after which every caller stalls until the
//! window boundary. Admissions are not evenly spaced inside a window.
//!
//! The window is tracked as the instants of the last `limit` grants. A caller that would
//! exceed the ceiling waits until the oldest of those grants is `period` old, which
//! keeps the bound for every rolling window and not only for aligned ones.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Outcome of waiting on the limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The caller may fetch now
    Granted,
    /// The crawl was cancelled while waiting
    Cancelled,
}

/// Shared burst-then-pause throttle
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    period: Duration,
    grants: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting at most `limit` fetches per `period`
    ///
    /// A zero limit is raised to one.
    pub fn new(limit: u32, period: Duration) -> Self {
        let limit = limit.max(1) as usize;

        Self {
            limit,
            period,
            grants: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    /// Creates a limiter admitting at most `limit` fetches per second
    pub fn per_second(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(1))
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Waits until a fetch may proceed
    ///
    /// There is nothing to release afterwards. Returns `Admission::Cancelled` as soon as
    /// `cancel` fires, whether the caller is queued behind other workers or stalled on the
    /// window boundary.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Admission {
        // The lock is held across the stall so the count, the comparison and the reset
        // happen as one step for every caller.
        let mut grants = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Admission::Cancelled,
            guard = self.grants.lock() => guard,
        };

        self.expire(&mut grants, Instant::now());

        if grants.len() >= self.limit {
            if let Some(&oldest) = grants.front() {
                let boundary = oldest + self.period;
                tracing::trace!(
                    "Rate limit of {} per {:?} reached, pausing {:?}",
                    self.limit,
                    self.period,
                    boundary.saturating_duration_since(Instant::now())
                );

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Admission::Cancelled,
                    _ = sleep_until(boundary) => {}
                }
            }

            self.expire(&mut grants, Instant::now());
        }

        grants.push_back(Instant::now());
        Admission::Granted
    }

    /// Drops grants that have left the window ending at `now`
    fn expire(&self, grants: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = grants.front() {
            if now.duration_since(oldest) >= self.period {
                grants.pop_front();
            } else {
                break;
            }
        }
    }
}
