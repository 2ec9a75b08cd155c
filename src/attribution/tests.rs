//! Attribution module tests.

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::*;

/// An owner source that counts external lookups.
struct CountingSource {
    lookups: AtomicUsize,
    answer: Option<String>,
}

impl CountingSource {
    fn new(answer: Option<&str>) -> Self {
        CountingSource {
            lookups: AtomicUsize::new(0),
            answer: answer.map(String::from),
        }
    }
}

#[async_trait]
impl OwnerSource for CountingSource {
    async fn lookup_owner(&self, _ip: IpAddr) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn test_classify_provider_known_suffixes() {
    assert_eq!(
        classify_provider("ec2-3-8-1-2.eu-west-2.compute.amazonaws.com"),
        Some("Amazon AWS")
    );
    assert_eq!(classify_provider("server-1.fastly.net"), Some("Fastly"));
    assert_eq!(
        classify_provider("lhr25s10-in-f14.1e100.net"),
        Some("Google LLC")
    );
    assert_eq!(
        classify_provider("static.123.45.67.89.clients.your-server.de"),
        Some("Hetzner")
    );
}

#[test]
fn test_classify_provider_requires_dot_boundary() {
    // A lookalike host must not match on a bare substring
    assert_eq!(classify_provider("notcloudflare.com"), None);
    assert_eq!(classify_provider("amazonaws.com.evil.org"), None);
    assert_eq!(classify_provider("host.example.net"), None);
}

#[tokio::test]
async fn test_attribute_caches_successful_lookup() {
    let source = Arc::new(CountingSource::new(Some("Cloudflare")));
    let attributor = IpAttributor::new(source.clone(), Arc::new(AttributionCache::new()));

    let first = attributor.attribute(ip("198.51.100.7")).await;
    let second = attributor.attribute(ip("198.51.100.7")).await;

    assert_eq!(first, "Cloudflare");
    assert_eq!(second, "Cloudflare");
    // Second call must be served from the cache
    assert_eq!(source.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_attribute_caches_failures_as_empty() {
    let source = Arc::new(CountingSource::new(None));
    let attributor = IpAttributor::new(source.clone(), Arc::new(AttributionCache::new()));

    assert_eq!(attributor.attribute(ip("198.51.100.8")).await, "");
    assert_eq!(attributor.attribute(ip("198.51.100.8")).await, "");
    // A failure costs exactly one external lookup per IP
    assert_eq!(source.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_attribute_distinct_ips_looked_up_separately() {
    let source = Arc::new(CountingSource::new(Some("Amazon AWS")));
    let attributor = IpAttributor::new(source.clone(), Arc::new(AttributionCache::new()));

    attributor.attribute(ip("198.51.100.9")).await;
    attributor.attribute(ip("198.51.100.10")).await;
    assert_eq!(source.lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cache_shared_across_attributors() {
    // The cache outlives any single scan; a second attributor wired to the
    // same cache sees earlier results
    let cache = Arc::new(AttributionCache::new());
    let first_source = Arc::new(CountingSource::new(Some("OVH")));
    let first = IpAttributor::new(first_source, cache.clone());
    first.attribute(ip("198.51.100.11")).await;

    let second_source = Arc::new(CountingSource::new(Some("should-not-be-used")));
    let second = IpAttributor::new(second_source.clone(), cache.clone());
    assert_eq!(second.attribute(ip("198.51.100.11")).await, "OVH");
    assert_eq!(second_source.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(cache.len().await, 1);
}
