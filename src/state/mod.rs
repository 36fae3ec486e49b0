//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Frontier`: the visited set and work queue shared by all workers
//! - `WorkerState`: the lifecycle of a single crawl worker

mod frontier;
mod worker_state;

// Re-export main types
pub use frontier::Frontier;
pub use worker_state::WorkerState;
