//! CertSpotter aggregator client.
//!
//! Queries the issuance endpoint with `include_subdomains=true` and
//! `expand=dns_names`. Unlike crt.sh, names arrive as a proper array and
//! `not_after` is RFC 3339.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::CtSource;
use crate::config::CERTSPOTTER_URL;
use crate::models::CertificateRecord;

#[derive(Debug, Deserialize)]
pub(crate) struct CertSpotterEntry {
    #[serde(default)]
    pub(crate) dns_names: Vec<String>,
    #[serde(default)]
    pub(crate) issuer: String,
    #[serde(default)]
    pub(crate) not_after: Option<String>,
}

/// CT source backed by SSLMate's CertSpotter API.
pub struct CertSpotterSource {
    client: Arc<reqwest::Client>,
}

impl CertSpotterSource {
    /// Wraps the shared HTTP client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        CertSpotterSource { client }
    }
}

#[async_trait]
impl CtSource for CertSpotterSource {
    fn name(&self) -> &'static str {
        "certspotter"
    }

    async fn fetch(&self, domain: &str) -> Result<Vec<CertificateRecord>> {
        let response = self
            .client
            .get(CERTSPOTTER_URL)
            .query(&[
                ("domain", domain),
                ("include_subdomains", "true"),
                ("expand", "dns_names"),
            ])
            .send()
            .await
            .context("certspotter request failed")?;

        if !response.status().is_success() {
            bail!("certspotter returned status {}", response.status());
        }

        let entries: Vec<CertSpotterEntry> = response
            .json()
            .await
            .context("certspotter returned unparseable JSON")?;
        Ok(records_from_entries(entries))
    }
}

pub(crate) fn records_from_entries(entries: Vec<CertSpotterEntry>) -> Vec<CertificateRecord> {
    entries
        .into_iter()
        .map(|entry| CertificateRecord {
            names: entry.dns_names,
            issuer: entry.issuer,
            not_after: entry.not_after.as_deref().and_then(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }),
        })
        .collect()
}
