//! Multi-account dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! private keys + TransferTemplate
//!     → dispatcher.rs (one worker per key, staggered launch)
//!         → wallet.rs (resolve) → transaction.rs (build, sign) → ledger submit
//!     → outcome.rs (Success | Failure per key)
//!     → report.rs (line per outcome, summary counts)
//! ```

pub mod dispatcher;
pub mod outcome;
pub mod report;

pub use dispatcher::{DispatchOptions, Dispatcher};
pub use outcome::{DispatchError, TransactionOutcome};
pub use report::{ResultAggregator, SummaryReport};
