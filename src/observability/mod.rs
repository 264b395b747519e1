//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, stderr)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured fields (address, tx_hash, key_index) on every event
//! - Private keys never reach a log line
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
