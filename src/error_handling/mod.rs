//! Error taxonomy and scan statistics.
//!
//! Only two failures cross the scan boundary: an unreachable CT source and
//! a deadline that expired with nothing assembled. Everything else degrades
//! per item and is tracked in `ScanStats`.

mod stats;
mod types;

pub use stats::ScanStats;
pub use types::{ErrorType, InitializationError, ScanError};
