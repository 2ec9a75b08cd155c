//! Per-candidate enrichment.
//!
//! Each candidate runs DNS resolution first, then ownership attribution and
//! the TLS probe concurrently. Every stage sits behind its own semaphore so
//! a backlog of slow probes never starves resolution, and behind its own
//! timeout so the scan deadline's cancellation stays cooperative.

use std::net::IpAddr;
use std::sync::Arc;

use hickory_resolver::TokioAsyncResolver;
use tokio::sync::Semaphore;

use crate::attribution::IpAttributor;
use crate::config::{ATTRIBUTION_TIMEOUT, DNS_LOOKUP_TIMEOUT};
use crate::dns::resolve_host_ips;
use crate::error_handling::{ErrorType, ScanStats};
use crate::models::{CertHint, ResolvedHost};
use crate::tls::{probe_certificate, LeafCertificate};

pub(crate) struct EnrichmentContext {
    pub resolver: Arc<TokioAsyncResolver>,
    pub attributor: Arc<IpAttributor>,
    pub stats: Arc<ScanStats>,
    pub dns_pool: Arc<Semaphore>,
    pub tls_pool: Arc<Semaphore>,
    pub attribution_pool: Arc<Semaphore>,
    pub owner_lookup: bool,
}

/// Enriches one candidate into its final `ResolvedHost`.
///
/// Failures at any stage degrade the affected field and are counted; this
/// function never errors, so one bad name cannot take down the batch.
pub(crate) async fn enrich_candidate(
    ctx: Arc<EnrichmentContext>,
    name: String,
    hint: CertHint,
) -> ResolvedHost {
    let ips = resolve_stage(&ctx, &name).await;

    if ips.is_empty() {
        // Discovery value is kept even when resolution fails: the name
        // still appears, carrying whatever cert data CT supplied.
        let mut host = ResolvedHost::bare(name);
        host.cert_issuer = hint.issuer;
        host.cert_expiry = hint.not_after;
        return host;
    }

    let (owner, cert) = tokio::join!(owner_stage(&ctx, &ips), cert_stage(&ctx, &name, &hint));

    ResolvedHost {
        name,
        ips: ips.iter().map(ToString::to_string).collect(),
        ip_owner: owner,
        cert_issuer: cert.issuer,
        cert_expiry: cert.not_after,
    }
}

/// DNS stage: all addresses for the name, or empty on any failure.
async fn resolve_stage(ctx: &EnrichmentContext, name: &str) -> Vec<IpAddr> {
    let _permit = match ctx.dns_pool.acquire().await {
        Ok(permit) => permit,
        Err(_) => {
            log::warn!("DNS pool closed, skipping resolution for {name}");
            return Vec::new();
        }
    };
    match tokio::time::timeout(DNS_LOOKUP_TIMEOUT, resolve_host_ips(name, &ctx.resolver)).await {
        Ok(Ok(ips)) => ips,
        Ok(Err(_)) => {
            ctx.stats.increment_error(ErrorType::DnsResolutionError);
            Vec::new()
        }
        Err(_) => {
            log::debug!("resolution timed out for {name}");
            ctx.stats.increment_error(ErrorType::DnsResolutionError);
            Vec::new()
        }
    }
}

/// Attribution stage: owner of the first successfully attributed IP.
///
/// `ips` arrive sorted from the resolver, which makes the tie-break
/// deterministic: lowest-sorted IP first.
async fn owner_stage(ctx: &EnrichmentContext, ips: &[IpAddr]) -> String {
    if !ctx.owner_lookup {
        return String::new();
    }
    for ip in ips {
        let _permit = match ctx.attribution_pool.acquire().await {
            Ok(permit) => permit,
            Err(_) => return String::new(),
        };
        match tokio::time::timeout(ATTRIBUTION_TIMEOUT, ctx.attributor.attribute(*ip)).await {
            Ok(owner) if !owner.is_empty() => return owner,
            Ok(_) => {}
            Err(_) => {
                log::debug!("attribution timed out for {ip}");
                ctx.stats.increment_error(ErrorType::AttributionError);
            }
        }
    }
    String::new()
}

/// Certificate stage: CT-supplied data when complete, otherwise a live
/// probe. A failed probe yields empty fields, never an error.
async fn cert_stage(ctx: &EnrichmentContext, name: &str, hint: &CertHint) -> LeafCertificate {
    if hint.is_complete() {
        log::debug!("{name}: using CT-supplied certificate data, skipping probe");
        return LeafCertificate {
            issuer: hint.issuer.clone(),
            not_after: hint.not_after,
        };
    }

    let _permit = match ctx.tls_pool.acquire().await {
        Ok(permit) => permit,
        Err(_) => {
            return LeafCertificate {
                issuer: String::new(),
                not_after: None,
            }
        }
    };
    match probe_certificate(name).await {
        Ok(leaf) => leaf,
        Err(e) => {
            log::debug!("TLS probe failed for {name}: {e:#}");
            ctx.stats.increment_error(ErrorType::TlsProbeError);
            LeafCertificate {
                issuer: String::new(),
                not_after: None,
            }
        }
    }
}
