//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the ledger:
//!     → timeouts.rs (enforce per-call deadline)
//!     → on failure the RPC client moves on to the next endpoint
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Submissions are never retried once a node has answered

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded};
