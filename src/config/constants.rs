//! Configuration constants.
//!
//! All timeouts, pool sizes, retry settings, and upstream endpoints used by
//! the scan pipeline live here.

use std::time::Duration;

/// Default address the API server binds to.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default port the API server listens on.
pub const DEFAULT_PORT: u16 = 8080;

/// Default User-Agent for outbound requests (CT aggregators, registry lookups).
pub const DEFAULT_USER_AGENT: &str = concat!("domain_scout/", env!("CARGO_PKG_VERSION"));

// Certificate Transparency sources
/// crt.sh JSON query endpoint. `%.` prefixes the domain to match all subdomains.
pub const CRTSH_URL: &str = "https://crt.sh/";
/// CertSpotter issuance query endpoint.
pub const CERTSPOTTER_URL: &str = "https://api.certspotter.com/v1/issuances";
/// Per-request timeout for CT aggregator queries.
/// Aggregators are frequently slow under load; 10s keeps a slow source from
/// eating most of the scan deadline while still tolerating normal latency.
pub const CT_REQUEST_TIMEOUT_SECS: u64 = 10;

// Retry strategy for CT sources
/// Initial delay in milliseconds before first retry; doubles per retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 15;
/// Maximum number of attempts per CT source (initial attempt + 2 retries)
pub const RETRY_MAX_ATTEMPTS: usize = 3;

// Network operation timeouts
/// DNS query timeout in seconds.
/// Most queries complete in <1s; 3s provides buffer while failing fast on
/// unresponsive resolvers.
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Outer bound on a single name's resolution, covering resolver retries.
pub const DNS_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// Outer bound on a single IP's ownership lookup (reverse DNS + registry).
pub const ATTRIBUTION_TIMEOUT: Duration = Duration::from_secs(5);

// Per-stage worker pools
/// Concurrent DNS lookups per scan.
pub const DNS_POOL_SIZE: usize = 30;
/// Concurrent TLS probes per scan. Lower than DNS: each probe holds a socket
/// through connect + handshake.
pub const TLS_POOL_SIZE: usize = 12;
/// Concurrent ownership lookups per scan. Kept small so the registry
/// endpoint is not hammered when the cache is cold.
pub const ATTRIBUTION_POOL_SIZE: usize = 10;
/// Candidates in flight at once across all enrichment stages.
pub const ENRICHMENT_PIPELINE_WIDTH: usize = 50;

/// Overall scan deadline in seconds. When it elapses the scan returns
/// whatever items have been assembled rather than failing outright.
pub const SCAN_DEADLINE_SECS: u64 = 45;
