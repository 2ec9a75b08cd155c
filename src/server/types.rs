//! API server data structures.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::attribution::AttributionCache;
use crate::scan::Scanner;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    /// The scan pipeline, shared by all requests.
    pub scanner: Arc<Scanner>,
    /// Request counters for the status endpoint.
    pub server_stats: Arc<ServerStats>,
    /// The process-wide attribution cache (for size reporting).
    pub cache: Arc<AttributionCache>,
}

/// Process-lifetime request counters.
pub struct ServerStats {
    /// Scans accepted (valid query, pipeline entered).
    pub scans_started: AtomicUsize,
    /// Scans that returned a 200.
    pub scans_completed: AtomicUsize,
    /// Scans that returned an error status.
    pub scans_failed: AtomicUsize,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl ServerStats {
    /// Creates counters anchored to now.
    pub fn new() -> Self {
        ServerStats {
            scans_started: AtomicUsize::new(0),
            scans_completed: AtomicUsize::new(0),
            scans_failed: AtomicUsize::new(0),
            started_at: Instant::now(),
        }
    }
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters for `/api/subdomains`.
#[derive(Deserialize)]
pub struct SubdomainQuery {
    /// The domain to scan; required, validated by the handler.
    pub domain: Option<String>,
}

/// JSON error body used for every non-200 response.
#[derive(Serialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub error: String,
}

/// JSON response for `/status`.
#[derive(Serialize)]
#[allow(missing_docs)] // Field names are the documentation
pub struct StatusResponse {
    pub uptime_seconds: f64,
    pub scans_started: usize,
    pub scans_completed: usize,
    pub scans_failed: usize,
    pub attribution_cache_size: usize,
    pub errors: ErrorCounts,
}

/// Per-stage failure counters.
#[derive(Serialize)]
#[allow(missing_docs)] // Field names are the documentation
pub struct ErrorCounts {
    pub total: usize,
    pub ct_source: usize,
    pub dns_resolution: usize,
    pub attribution: usize,
    pub tls_probe: usize,
    pub scan_deadline: usize,
}
