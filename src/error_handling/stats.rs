//! Scan statistics tracking.
//!
//! Thread-safe counters for per-stage failures, shared across all scans in
//! the process and exposed through the status endpoint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorType;

/// Thread-safe scan statistics tracker.
///
/// Every `ErrorType` gets an atomic counter at construction, so increments
/// never allocate and can run from any number of concurrent tasks.
pub struct ScanStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl ScanStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        ScanStats { errors }
    }

    /// Increment an error counter.
    ///
    /// All error types are initialized in the constructor; a missing entry
    /// indicates a bug, which is logged rather than panicking.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map. \
                 This indicates a bug in ScanStats initialization.",
                error
            );
        }
    }

    /// Current count for one error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum over all error types.
    pub fn total_errors(&self) -> usize {
        self.errors
            .values()
            .map(|counter| counter.load(Ordering::Relaxed))
            .sum()
    }

    /// Logs a one-line summary of non-zero counters.
    pub fn log_summary(&self) {
        let total = self.total_errors();
        if total == 0 {
            return;
        }
        let mut parts: Vec<String> = ErrorType::iter()
            .filter_map(|error| {
                let count = self.get_error_count(error);
                if count > 0 {
                    Some(format!("{}={}", error.label(), count))
                } else {
                    None
                }
            })
            .collect();
        parts.sort();
        log::debug!("scan error counters: {}", parts.join(" "));
    }
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}
