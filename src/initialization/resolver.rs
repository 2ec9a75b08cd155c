//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::TokioAsyncResolver;

use crate::error_handling::InitializationError;

/// Initializes the DNS resolver for candidate resolution and reverse
/// lookups.
///
/// Uses the default resolver configuration (Google DNS) with aggressive
/// timeouts so slow or unresponsive DNS servers fail fast instead of
/// eating into the scan deadline. `ndots = 0` prevents search-domain
/// appending on the bare hostnames we resolve.
pub fn init_resolver() -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    use hickory_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};

    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(crate::config::DNS_TIMEOUT_SECS);
    opts.attempts = 2; // Reduce retry attempts to fail faster
    opts.ndots = 0;
    // Collect A and AAAA records; the default strategy stops at IPv4
    opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;

    Ok(Arc::new(TokioAsyncResolver::tokio(
        ResolverConfig::default(),
        opts,
    )))
}
