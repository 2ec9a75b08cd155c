//! IP address resolution and reverse DNS lookup.

use std::net::IpAddr;

use anyhow::{Error, Result};
use hickory_resolver::TokioAsyncResolver;

/// Resolves a hostname to all of its IP addresses (A and AAAA).
///
/// The result is sorted and deduplicated so callers see a deterministic
/// address list regardless of resolver answer ordering.
///
/// A name that exists but has no address records, or does not exist at all
/// (NXDOMAIN), resolves to an empty list - that is a normal answer for CT
/// discoveries, many of which are long dead. Transport failures (timeouts,
/// network errors) are returned as errors so the caller can count them.
pub async fn resolve_host_ips(host: &str, resolver: &TokioAsyncResolver) -> Result<Vec<IpAddr>> {
    match resolver.lookup_ip(host).await {
        Ok(response) => {
            let mut ips: Vec<IpAddr> = response.iter().collect();
            ips.sort();
            ips.dedup();
            Ok(ips)
        }
        Err(e) => {
            let error_msg = e.to_string();
            // "no records found" / NXDomain is an expected outcome for
            // candidate names harvested from CT logs
            if error_msg.contains("no records found") || error_msg.contains("NXDomain") {
                Ok(Vec::new())
            } else {
                if error_msg.contains("timeout") || error_msg.contains("timed out") {
                    log::debug!("DNS lookup timed out for {host}: {e}");
                } else {
                    log::debug!("DNS lookup failed for {host}: {e}");
                }
                Err(Error::new(e))
            }
        }
    }
}

/// Performs a reverse DNS lookup (PTR record) for an IP address.
///
/// Returns the first PTR name, or `None` if the lookup fails - a missing
/// PTR record is common and not an error worth surfacing.
pub async fn reverse_dns_lookup(ip: IpAddr, resolver: &TokioAsyncResolver) -> Option<String> {
    match resolver.reverse_lookup(ip).await {
        Ok(response) => response.iter().next().map(|name| name.to_utf8()),
        Err(e) => {
            log::debug!("Failed to perform reverse DNS lookup for {ip}: {e}");
            None
        }
    }
}
