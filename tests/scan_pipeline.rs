//! End-to-end pipeline tests with mocked CT sources.
//!
//! DNS and TLS run against the real network where one is available; the
//! assertions only cover properties that hold either way (discovery,
//! wildcard handling, ordering, count), never live enrichment values.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use domain_scout::attribution::{AttributionCache, IpAttributor, OwnerSource};
use domain_scout::ct::CtSource;
use domain_scout::{CertificateRecord, ScanError, ScanOptions, ScanStats, Scanner};

/// CT source yielding one fixed record.
struct MockCtSource {
    record: CertificateRecord,
}

#[async_trait]
impl CtSource for MockCtSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, _domain: &str) -> Result<Vec<CertificateRecord>> {
        Ok(vec![self.record.clone()])
    }
}

/// CT source that is permanently down.
struct DownCtSource;

#[async_trait]
impl CtSource for DownCtSource {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn fetch(&self, _domain: &str) -> Result<Vec<CertificateRecord>> {
        bail!("aggregator unreachable")
    }
}

/// CT source that answers slowly enough for a near-zero deadline to win.
struct SlowCtSource;

#[async_trait]
impl CtSource for SlowCtSource {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn fetch(&self, _domain: &str) -> Result<Vec<CertificateRecord>> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(Vec::new())
    }
}

struct SilentOwnerSource;

#[async_trait]
impl OwnerSource for SilentOwnerSource {
    async fn lookup_owner(&self, _ip: IpAddr) -> Option<String> {
        None
    }
}

fn build_scanner(sources: Vec<Arc<dyn CtSource>>, options: ScanOptions) -> Scanner {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(2);
    opts.attempts = 1;
    opts.ndots = 0;
    let resolver = Arc::new(TokioAsyncResolver::tokio(ResolverConfig::default(), opts));

    let attributor = Arc::new(IpAttributor::new(
        Arc::new(SilentOwnerSource),
        Arc::new(AttributionCache::new()),
    ));
    Scanner::new(
        sources,
        resolver,
        attributor,
        Arc::new(ScanStats::new()),
        options,
    )
}

fn record_with_names(names: &[&str]) -> CertificateRecord {
    CertificateRecord {
        names: names.iter().map(|n| n.to_string()).collect(),
        issuer: String::new(),
        not_after: None,
    }
}

#[tokio::test]
async fn test_wildcard_entry_counts_toward_flag_but_not_items() {
    let source = MockCtSource {
        record: record_with_names(&["api.example.com", "*.example.com", "example.com"]),
    };
    let scanner = build_scanner(vec![Arc::new(source)], ScanOptions::default());

    let result = scanner.scan("example.com").await.unwrap();

    assert!(result.has_wildcard);
    // The literal wildcard entry is not a browsable host
    assert_eq!(result.count, 2);
    assert_eq!(result.count, result.items.len());
    let names: Vec<&str> = result.items.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["api.example.com", "example.com"]);
}

#[tokio::test]
async fn test_all_sources_down_is_a_scan_error() {
    let scanner = build_scanner(vec![Arc::new(DownCtSource)], ScanOptions::default());

    let err = scanner.scan("example.com").await.unwrap_err();
    match err {
        ScanError::SourceUnavailable(msg) => assert!(!msg.is_empty()),
        other => panic!("expected SourceUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_one_live_source_is_enough() {
    let live = MockCtSource {
        record: record_with_names(&["www.example.com"]),
    };
    let scanner = build_scanner(
        vec![Arc::new(DownCtSource), Arc::new(live)],
        ScanOptions::default(),
    );

    let result = scanner.scan("example.com").await.unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].name, "www.example.com");
}

#[tokio::test]
async fn test_near_zero_deadline_yields_partial_result_not_error() {
    let options = ScanOptions {
        deadline: Duration::ZERO,
        ..ScanOptions::default()
    };
    let scanner = build_scanner(vec![Arc::new(SlowCtSource)], options);

    // Deadline fires while the source is still answering; the scan returns
    // whatever was assembled (nothing), never an exception
    let result = scanner.scan("example.com").await.unwrap();
    assert_eq!(result.count, 0);
    assert!(result.items.is_empty());
    assert!(result.partial);
}

#[tokio::test]
async fn test_unresolvable_names_keep_ct_certificate_data() {
    // Names under .invalid never resolve, making enrichment deterministic:
    // the item stays with empty ips and the CT-supplied cert fields
    let expiry = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
    let source = MockCtSource {
        record: CertificateRecord {
            names: vec!["cached.scan-target.invalid".to_string()],
            issuer: "Test CA".to_string(),
            not_after: Some(expiry),
        },
    };
    let scanner = build_scanner(vec![Arc::new(source)], ScanOptions::default());

    let result = scanner.scan("scan-target.invalid").await.unwrap();
    assert_eq!(result.count, 1);
    let host = &result.items[0];
    assert!(host.ips.is_empty());
    assert_eq!(host.cert_issuer, "Test CA");
    assert_eq!(host.cert_expiry, Some(expiry));
}

#[tokio::test]
async fn test_result_serializes_to_wire_contract() {
    let source = MockCtSource {
        record: record_with_names(&["a.scan-target.invalid"]),
    };
    let scanner = build_scanner(vec![Arc::new(source)], ScanOptions::default());

    let result = scanner.scan("scan-target.invalid").await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["domain"], "scan-target.invalid");
    assert_eq!(json["has_wildcard"], false);
    assert_eq!(json["count"], 1);
    let item = &json["items"][0];
    assert_eq!(item["name"], "a.scan-target.invalid");
    assert!(item["ips"].is_array());
    assert!(item["ip_owner"].is_string());
    assert!(item["cert_issuer"].is_string());
    // Absent expiry is the empty string on the wire, never null
    assert_eq!(item["cert_expiry"], "");
    // The partial marker is internal, not part of the contract
    assert!(json.get("partial").is_none());
}
