//! IP ownership attribution.
//!
//! Maps an IP address to the organization operating it:
//! 1. reverse DNS; a PTR hostname matching a known hosting-provider suffix
//!    resolves directly to the provider name
//! 2. registry lookup (ipinfo.io org endpoint) when the PTR is inconclusive
//! 3. the raw PTR name as a last resort
//!
//! Results are cached per IP for the process lifetime: subdomains of one
//! domain overwhelmingly share CDN/cloud infrastructure, so the cache turns
//! an O(names) external-lookup cost into O(unique IPs). Failures cache as
//! the empty string - one external lookup per IP, ever.

mod cache;

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;

use crate::dns::reverse_dns_lookup;

pub use cache::AttributionCache;

/// PTR-hostname suffixes of the hosting providers that dominate CT-derived
/// infrastructure. Matching is on dot-separated suffix so `cloudflare.com`
/// never matches `notcloudflare.com`.
const PROVIDER_PATTERNS: &[(&str, &str)] = &[
    ("amazonaws.com", "Amazon AWS"),
    ("cloudfront.net", "Amazon AWS"),
    ("awsglobalaccelerator.com", "Amazon AWS"),
    ("cloudflare.com", "Cloudflare"),
    ("cloudflare.net", "Cloudflare"),
    ("googleusercontent.com", "Google LLC"),
    ("1e100.net", "Google LLC"),
    ("googlehosted.com", "Google LLC"),
    ("azure.com", "Microsoft Azure"),
    ("cloudapp.net", "Microsoft Azure"),
    ("azurewebsites.net", "Microsoft Azure"),
    ("akamaitechnologies.com", "Akamai"),
    ("akamaiedge.net", "Akamai"),
    ("fastly.net", "Fastly"),
    ("digitalocean.com", "DigitalOcean"),
    ("your-server.de", "Hetzner"),
    ("hetzner.com", "Hetzner"),
    ("ovh.net", "OVH"),
    ("linodeusercontent.com", "Linode"),
];

/// An external source of IP ownership information.
///
/// Split out as a trait so the orchestrator can be exercised without
/// network access and so cache behavior is observable in tests.
#[async_trait]
pub trait OwnerSource: Send + Sync {
    /// Best-effort owner lookup; `None` when nothing could be determined.
    async fn lookup_owner(&self, ip: IpAddr) -> Option<String>;
}

/// Production owner source: reverse DNS plus the ipinfo.io registry.
pub struct NetworkOwnerSource {
    resolver: Arc<TokioAsyncResolver>,
    client: Arc<reqwest::Client>,
}

impl NetworkOwnerSource {
    /// Builds the production source from the shared resolver and client.
    pub fn new(resolver: Arc<TokioAsyncResolver>, client: Arc<reqwest::Client>) -> Self {
        NetworkOwnerSource { resolver, client }
    }

    /// Registry lookup: `https://ipinfo.io/{ip}/org` answers with a single
    /// plain-text line like `AS13335 Cloudflare, Inc.`.
    async fn registry_org(&self, ip: IpAddr) -> Option<String> {
        let url = format!("https://ipinfo.io/{ip}/org");
        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                log::debug!("registry lookup for {ip} returned {}", response.status());
                return None;
            }
            Err(e) => {
                log::debug!("registry lookup for {ip} failed: {e}");
                return None;
            }
        };
        let body = response.text().await.ok()?;
        let org = body.trim();
        if org.is_empty() {
            None
        } else {
            Some(org.to_string())
        }
    }
}

#[async_trait]
impl OwnerSource for NetworkOwnerSource {
    async fn lookup_owner(&self, ip: IpAddr) -> Option<String> {
        if let Some(ptr) = reverse_dns_lookup(ip, &self.resolver).await {
            let ptr = ptr.trim_end_matches('.').to_lowercase();
            if let Some(provider) = classify_provider(&ptr) {
                return Some(provider.to_string());
            }
            if let Some(org) = self.registry_org(ip).await {
                return Some(org);
            }
            return Some(ptr);
        }
        self.registry_org(ip).await
    }
}

/// Matches a PTR hostname against the provider suffix table.
pub fn classify_provider(ptr: &str) -> Option<&'static str> {
    PROVIDER_PATTERNS.iter().find_map(|(suffix, provider)| {
        if ptr == *suffix || ptr.ends_with(&format!(".{suffix}")) {
            Some(*provider)
        } else {
            None
        }
    })
}

/// Cache-fronted IP attribution.
///
/// The cache is injected rather than hidden in a global so tests and
/// embedders can seed or reset it; the server constructs one per process
/// and shares it across every scan.
pub struct IpAttributor {
    source: Arc<dyn OwnerSource>,
    cache: Arc<AttributionCache>,
}

impl IpAttributor {
    /// Fronts `source` with the shared `cache`.
    pub fn new(source: Arc<dyn OwnerSource>, cache: Arc<AttributionCache>) -> Self {
        IpAttributor { source, cache }
    }

    /// Attributes one IP, consulting the cache first. A failed lookup
    /// yields (and caches) the empty string; attribution never errors.
    pub async fn attribute(&self, ip: IpAddr) -> String {
        if let Some(owner) = self.cache.get(ip).await {
            log::debug!("attribution cache hit for {ip}");
            return owner;
        }
        let owner = self.source.lookup_owner(ip).await.unwrap_or_default();
        self.cache.insert(ip, owner.clone()).await;
        owner
    }
}

#[cfg(test)]
mod tests;
