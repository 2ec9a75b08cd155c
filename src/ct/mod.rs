//! Certificate Transparency source clients.
//!
//! CT log aggregators are the discovery backbone of a scan: every hostname
//! a CA ever issued a certificate for shows up in the logs. This module
//! provides:
//! - the `CtSource` trait, so aggregators are pluggable (and mockable)
//! - `CrtShSource` and `CertSpotterSource`, the two production sources
//! - `harvest()`, which queries every configured source with retries and
//!   merges the results
//!
//! Sources routinely rate-limit or fall over; a scan only fails when every
//! source does.

mod certspotter;
mod crtsh;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

use crate::config::{RETRY_INITIAL_DELAY_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY_SECS};
use crate::error_handling::{ErrorType, ScanError, ScanStats};
use crate::models::CertificateRecord;

pub use certspotter::CertSpotterSource;
pub use crtsh::CrtShSource;

/// A queryable Certificate Transparency aggregator.
///
/// `fetch` returns every certificate record where the domain appears in the
/// subject or SANs, wildcard forms included. Duplicate certificates for the
/// same name are expected and resolved downstream by deduplication.
#[async_trait]
pub trait CtSource: Send + Sync {
    /// Short source name for logging.
    fn name(&self) -> &'static str;

    /// Queries the aggregator for all certificates covering `domain`.
    async fn fetch(&self, domain: &str) -> Result<Vec<CertificateRecord>>;
}

/// Retry strategy for a single CT source: `RETRY_INITIAL_DELAY_MS` before
/// the first retry, doubling per attempt, capped at `RETRY_MAX_DELAY_SECS`,
/// `RETRY_MAX_ATTEMPTS` total attempts.
///
/// `ExponentialBackoff` multiplies its *base* into the running value each
/// step, so doubling comes from base 2 with the initial delay as the
/// factor.
fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(RETRY_INITIAL_DELAY_MS / 2)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(RETRY_MAX_ATTEMPTS - 1)
}

/// Queries every source for `domain` and merges the record batches.
///
/// Each source gets its own retry budget. A source that still fails after
/// retries is logged and counted, but the harvest proceeds: one live source
/// is enough. `SourceUnavailable` is returned only when every source failed
/// and no records were collected.
pub async fn harvest(
    sources: &[Arc<dyn CtSource>],
    domain: &str,
    stats: &ScanStats,
) -> Result<Vec<CertificateRecord>, ScanError> {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for source in sources {
        let attempt = || source.fetch(domain);
        match Retry::spawn(retry_strategy(), attempt).await {
            Ok(batch) => {
                log::info!(
                    "{}: {} certificate records for {}",
                    source.name(),
                    batch.len(),
                    domain
                );
                records.extend(batch);
            }
            Err(e) => {
                log::warn!("{} query failed for {}: {:#}", source.name(), domain, e);
                stats.increment_error(ErrorType::CtSourceError);
                failures.push(format!("{}: {e:#}", source.name()));
            }
        }
    }

    if records.is_empty() && !failures.is_empty() {
        return Err(ScanError::SourceUnavailable(failures.join("; ")));
    }
    Ok(records)
}
