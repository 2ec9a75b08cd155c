//! domain_scout library: subdomain reconnaissance pipeline
//!
//! This library discovers subdomains of a target domain through Certificate
//! Transparency logs and enriches each discovery with DNS addresses, IP
//! ownership, and live TLS certificate data. The pipeline is best-effort by
//! design: a failing enrichment stage empties one field of one item, it
//! never hides a discovered subdomain.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use domain_scout::attribution::{AttributionCache, IpAttributor, NetworkOwnerSource};
//! use domain_scout::ct::{CrtShSource, CtSource};
//! use domain_scout::initialization::{init_client, init_resolver};
//! use domain_scout::{ScanOptions, ScanStats, Scanner};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = init_client("domain_scout/0.1.0")?;
//! let resolver = init_resolver()?;
//! let cache = Arc::new(AttributionCache::new());
//! let attributor = Arc::new(IpAttributor::new(
//!     Arc::new(NetworkOwnerSource::new(Arc::clone(&resolver), Arc::clone(&client))),
//!     cache,
//! ));
//! let sources: Vec<Arc<dyn CtSource>> = vec![Arc::new(CrtShSource::new(client))];
//!
//! let scanner = Scanner::new(
//!     sources,
//!     resolver,
//!     attributor,
//!     Arc::new(ScanStats::new()),
//!     ScanOptions::default(),
//! );
//! let result = scanner.scan("example.com").await?;
//! println!("{} subdomains (wildcard: {})", result.count, result.has_wildcard);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

pub mod attribution;
pub mod config;
pub mod ct;
mod dns;
pub mod domain;
pub mod error_handling;
pub mod initialization;
pub mod models;
pub mod scan;
pub mod server;
mod tls;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ScanError, ScanStats};
pub use models::{CertificateRecord, ResolvedHost, ScanResult};
pub use scan::{ScanOptions, Scanner};
