//! DNS resolution for candidate names.
//!
//! This module provides async DNS operations using `hickory-resolver`:
//! - IP address resolution (A/AAAA records) for candidate subdomains
//! - Reverse lookups (PTR records) feeding IP attribution
//!
//! All operations are async and use the resolver configured in
//! `initialization::init_resolver`.

mod resolution;

// Re-export public API
pub use resolution::{resolve_host_ips, reverse_dns_lookup};
