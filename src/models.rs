//! Core data types shared across the scan pipeline.
//!
//! These are the types that flow between pipeline stages and out over the
//! HTTP boundary:
//! - `CertificateRecord` - raw entry from a Certificate Transparency source
//! - `CertHint` - issuer/expiry carried forward from CT data
//! - `ResolvedHost` - one enriched subdomain in the response
//! - `ScanResult` - the assembled response body

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// A raw certificate entry as reported by a CT log aggregator.
///
/// One certificate can cover many names (SANs plus the common name), and the
/// same name routinely appears across many reissued certificates. Duplicate
/// handling is the normalizer's job, not the source client's.
#[derive(Debug, Clone, Default)]
pub struct CertificateRecord {
    /// All DNS names the certificate covers (SANs + CN), unnormalized.
    pub names: Vec<String>,
    /// Issuer as reported by the aggregator (may be empty).
    pub issuer: String,
    /// Certificate expiry, when the aggregator reported a parseable one.
    pub not_after: Option<DateTime<Utc>>,
}

/// Issuer/expiry carried from CT data for a candidate name.
///
/// Used by the TLS prober as a cache: when a CT record already supplied both
/// fields for a name, the live probe is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertHint {
    /// Issuer as reported by the aggregator.
    pub issuer: String,
    /// Certificate expiry, when known.
    pub not_after: Option<DateTime<Utc>>,
}

impl CertHint {
    /// A hint is complete when it can stand in for a live probe.
    pub fn is_complete(&self) -> bool {
        !self.issuer.is_empty() && self.not_after.is_some()
    }
}

/// One discovered subdomain with its enrichment data.
///
/// Every enrichment field degrades independently: a name that never resolved
/// keeps an empty `ips` list, a failed probe keeps empty cert fields. An
/// absent piece of enrichment never hides a discovered subdomain.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedHost {
    /// The discovered subdomain.
    pub name: String,
    /// Resolved addresses, sorted; empty when resolution failed.
    pub ips: Vec<String>,
    /// Organization operating the first attributed IP; empty when unknown.
    pub ip_owner: String,
    /// Leaf-certificate issuer; empty when unknown.
    pub cert_issuer: String,
    /// Leaf-certificate expiry; serialized as ISO-8601 or empty string.
    #[serde(serialize_with = "serialize_expiry")]
    pub cert_expiry: Option<DateTime<Utc>>,
}

impl ResolvedHost {
    /// A bare entry for a name before any enrichment has landed.
    pub fn bare(name: String) -> Self {
        ResolvedHost {
            name,
            ips: Vec::new(),
            ip_owner: String::new(),
            cert_issuer: String::new(),
            cert_expiry: None,
        }
    }
}

/// The assembled result of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// The normalized scan domain.
    pub domain: String,
    /// Whether a `*.{domain}` certificate was observed.
    pub has_wildcard: bool,
    /// Always equals `items.len()`.
    pub count: usize,
    /// Sorted lexicographically by name.
    pub items: Vec<ResolvedHost>,
    /// True when the scan deadline cut enrichment short and `items` holds
    /// only what had completed. Not part of the wire contract.
    #[serde(skip)]
    pub partial: bool,
}

impl ScanResult {
    /// Assembles the final result: items sorted by name, count pinned to
    /// the item count so the two can never drift apart.
    pub fn assemble(
        domain: String,
        has_wildcard: bool,
        mut items: Vec<ResolvedHost>,
        partial: bool,
    ) -> Self {
        items.sort_by(|a, b| a.name.cmp(&b.name));
        ScanResult {
            domain,
            has_wildcard,
            count: items.len(),
            items,
            partial,
        }
    }
}

/// Serializes `cert_expiry` as an ISO-8601 string, with absent values as the
/// empty string. The boundary contract has no null-vs-absent ambiguity.
fn serialize_expiry<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => serializer.serialize_str(""),
    }
}
