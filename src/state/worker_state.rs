/// Worker state definitions for tracking a worker's lifecycle
///
/// A worker loops through the active states once per queue item and leaves the loop
/// through exactly one of the exit states before reaching `Done`.
use std::fmt;

/// Represents the current state of a crawl worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    // ===== Active States =====
    /// Waiting for a URL to arrive on the work queue
    WaitingForWork,

    /// Holding a URL, waiting for the rate limiter to admit the fetch
    RateLimited,

    /// Fetching the document
    Fetching,

    /// Scanning the document body for citations
    Extracting,

    // ===== Exit States =====
    /// No queue item arrived within the idle timeout
    IdleExpired,

    /// The crawl's cancellation token fired
    Cancelled,

    // ===== Terminal State =====
    /// The worker has exited
    Done,
}

impl WorkerState {
    /// Returns true once the worker has exited
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while the worker is still processing queue items
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::WaitingForWork | Self::RateLimited | Self::Fetching | Self::Extracting
        )
    }

    /// Returns true if `next` is a legal successor of this state
    ///
    /// Cancellation is reachable from every active state. A failed or timed-out item
    /// returns the worker from `Fetching` or `Extracting` straight to `WaitingForWork`.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        use WorkerState::*;

        match (self, next) {
            (state, Cancelled) if state.is_active() => true,
            (WaitingForWork, RateLimited | IdleExpired) => true,
            (RateLimited, Fetching) => true,
            (Fetching, Extracting | WaitingForWork) => true,
            (Extracting, WaitingForWork) => true,
            (IdleExpired | Cancelled, Done) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WaitingForWork => "waiting_for_work",
            Self::RateLimited => "rate_limited",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::IdleExpired => "idle_expired",
            Self::Cancelled => "cancelled",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
