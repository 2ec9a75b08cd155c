//! Scan orchestration.
//!
//! Drives the pipeline for one domain: harvest CT records, collect
//! candidates, then resolve and enrich every candidate under an overall
//! deadline. Stage order and failure policy:
//!
//! - `Harvesting` is the only stage whose failure aborts the scan - with no
//!   CT data there is nothing to enrich.
//! - `Resolving`/`Enriching` degrade per item: a dead name keeps an empty
//!   IP list, a refused probe keeps empty cert fields.
//! - When the deadline elapses, whatever items completed are returned as a
//!   partial result; partial beats empty for a best-effort scan.
//!
//! Output ordering is imposed at assembly time (lexicographic by name);
//! concurrent completion order is never observable in the result.

mod enrich;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::StreamExt;
use hickory_resolver::TokioAsyncResolver;
use tokio::sync::Semaphore;

use crate::attribution::IpAttributor;
use crate::config::{
    ATTRIBUTION_POOL_SIZE, DNS_POOL_SIZE, ENRICHMENT_PIPELINE_WIDTH, SCAN_DEADLINE_SECS,
    TLS_POOL_SIZE,
};
use crate::ct::{harvest, CtSource};
use crate::domain::{collect_candidates, normalize_domain};
use crate::error_handling::{ErrorType, ScanError, ScanStats};
use crate::models::ScanResult;

use enrich::{enrich_candidate, EnrichmentContext};

/// Pipeline states for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Scan accepted, nothing started yet.
    Pending,
    /// Querying CT sources.
    Harvesting,
    /// Normalizing names and computing the wildcard flag.
    Resolving,
    /// DNS, attribution, and TLS enrichment in flight.
    Enriching,
    /// Result assembled.
    Done,
    /// Aborted by an unrecoverable error.
    Failed,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScanPhase::Pending => "pending",
            ScanPhase::Harvesting => "harvesting",
            ScanPhase::Resolving => "resolving",
            ScanPhase::Enriching => "enriching",
            ScanPhase::Done => "done",
            ScanPhase::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Tunable limits for one scanner instance.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Overall deadline; elapsed time past this returns a partial result.
    pub deadline: Duration,
    /// Concurrent DNS lookups.
    pub dns_pool: usize,
    /// Concurrent TLS probes.
    pub tls_pool: usize,
    /// Concurrent IP ownership lookups.
    pub attribution_pool: usize,
    /// Whether to attribute IPs at all.
    pub owner_lookup: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            deadline: Duration::from_secs(SCAN_DEADLINE_SECS),
            dns_pool: DNS_POOL_SIZE,
            tls_pool: TLS_POOL_SIZE,
            attribution_pool: ATTRIBUTION_POOL_SIZE,
            owner_lookup: true,
        }
    }
}

/// One scan pipeline instance, shared by all requests.
///
/// Holds no per-scan state; every `scan()` call owns its working set, and
/// the only cross-scan state is the attribution cache inside `attributor`.
pub struct Scanner {
    sources: Vec<Arc<dyn CtSource>>,
    resolver: Arc<TokioAsyncResolver>,
    attributor: Arc<IpAttributor>,
    stats: Arc<ScanStats>,
    options: ScanOptions,
}

impl Scanner {
    /// Wires a scanner from its collaborators.
    pub fn new(
        sources: Vec<Arc<dyn CtSource>>,
        resolver: Arc<TokioAsyncResolver>,
        attributor: Arc<IpAttributor>,
        stats: Arc<ScanStats>,
        options: ScanOptions,
    ) -> Self {
        Scanner {
            sources,
            resolver,
            attributor,
            stats,
            options,
        }
    }

    /// Shared statistics, exposed for the status endpoint.
    pub fn stats(&self) -> Arc<ScanStats> {
        Arc::clone(&self.stats)
    }

    /// Runs a full scan for `domain`.
    ///
    /// Fails only on an invalid domain or when every CT source is down;
    /// everything past harvesting degrades per item or returns partial
    /// results on deadline.
    pub async fn scan(&self, domain: &str) -> Result<ScanResult, ScanError> {
        let domain = normalize_domain(domain)?;
        let mut phase = ScanPhase::Pending;

        // One deadline spans the whole scan, harvesting included
        let deadline = tokio::time::sleep(self.options.deadline);
        tokio::pin!(deadline);

        self.advance(&mut phase, ScanPhase::Harvesting, &domain);
        let records = tokio::select! {
            harvested = harvest(&self.sources, &domain, &self.stats) => match harvested {
                Ok(records) => records,
                Err(e) => {
                    self.advance(&mut phase, ScanPhase::Failed, &domain);
                    return Err(e);
                }
            },
            _ = &mut deadline => {
                self.stats.increment_error(ErrorType::ScanDeadlineExceeded);
                log::warn!("{domain}: scan deadline elapsed during harvesting");
                self.advance(&mut phase, ScanPhase::Done, &domain);
                return Ok(ScanResult::assemble(domain, false, Vec::new(), true));
            }
        };

        self.advance(&mut phase, ScanPhase::Resolving, &domain);
        let candidates = collect_candidates(&domain, &records);
        let has_wildcard = candidates.has_wildcard;
        let total = candidates.names.len();
        log::info!(
            "{domain}: {} CT records yielded {total} candidate names (wildcard: {has_wildcard})",
            records.len()
        );

        self.advance(&mut phase, ScanPhase::Enriching, &domain);
        let ctx = Arc::new(EnrichmentContext {
            resolver: Arc::clone(&self.resolver),
            attributor: Arc::clone(&self.attributor),
            stats: Arc::clone(&self.stats),
            dns_pool: Arc::new(Semaphore::new(self.options.dns_pool)),
            tls_pool: Arc::new(Semaphore::new(self.options.tls_pool)),
            attribution_pool: Arc::new(Semaphore::new(self.options.attribution_pool)),
            owner_lookup: self.options.owner_lookup,
        });

        let mut stream = futures::stream::iter(
            candidates
                .names
                .into_iter()
                .map(|(name, hint)| enrich_candidate(Arc::clone(&ctx), name, hint)),
        )
        .buffer_unordered(ENRICHMENT_PIPELINE_WIDTH);

        let mut items = Vec::with_capacity(total);
        let mut partial = false;
        loop {
            tokio::select! {
                next = stream.next() => match next {
                    Some(host) => items.push(host),
                    None => break,
                },
                _ = &mut deadline => {
                    partial = true;
                    self.stats.increment_error(ErrorType::ScanDeadlineExceeded);
                    log::warn!(
                        "{domain}: scan deadline elapsed with {}/{total} names enriched; returning partial result",
                        items.len()
                    );
                    break;
                }
            }
        }

        self.advance(&mut phase, ScanPhase::Done, &domain);
        self.stats.log_summary();
        Ok(ScanResult::assemble(domain, has_wildcard, items, partial))
    }

    fn advance(&self, phase: &mut ScanPhase, next: ScanPhase, domain: &str) {
        log::debug!("scan {domain}: {phase} -> {next}");
        *phase = next;
    }
}
