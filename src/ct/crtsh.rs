//! crt.sh aggregator client.
//!
//! Queries `https://crt.sh/?q=%.{domain}&output=json`. One JSON entry per
//! certificate; `name_value` packs all covered names newline-separated, and
//! `not_after` is a naive timestamp treated as UTC.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;

use super::CtSource;
use crate::config::CRTSH_URL;
use crate::models::CertificateRecord;

#[derive(Debug, Deserialize)]
pub(crate) struct CrtShEntry {
    pub(crate) name_value: String,
    #[serde(default)]
    pub(crate) issuer_name: String,
    #[serde(default)]
    pub(crate) not_after: Option<String>,
}

/// CT source backed by crt.sh.
pub struct CrtShSource {
    client: Arc<reqwest::Client>,
}

impl CrtShSource {
    /// Wraps the shared HTTP client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        CrtShSource { client }
    }
}

#[async_trait]
impl CtSource for CrtShSource {
    fn name(&self) -> &'static str {
        "crt.sh"
    }

    async fn fetch(&self, domain: &str) -> Result<Vec<CertificateRecord>> {
        let response = self
            .client
            .get(CRTSH_URL)
            .query(&[("q", format!("%.{domain}").as_str()), ("output", "json")])
            .send()
            .await
            .context("crt.sh request failed")?;

        if !response.status().is_success() {
            bail!("crt.sh returned status {}", response.status());
        }

        let entries: Vec<CrtShEntry> = response
            .json()
            .await
            .context("crt.sh returned unparseable JSON")?;
        Ok(records_from_entries(entries))
    }
}

/// Converts raw crt.sh entries into certificate records, splitting the
/// newline-packed `name_value` field.
pub(crate) fn records_from_entries(entries: Vec<CrtShEntry>) -> Vec<CertificateRecord> {
    entries
        .into_iter()
        .map(|entry| CertificateRecord {
            names: entry
                .name_value
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
            issuer: entry.issuer_name,
            not_after: entry.not_after.as_deref().and_then(parse_not_after),
        })
        .collect()
}

/// crt.sh reports `not_after` as `%Y-%m-%dT%H:%M:%S` without a zone; the
/// log timestamps are UTC.
fn parse_not_after(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_records_from_entries_splits_name_value() {
        let entries: Vec<CrtShEntry> = serde_json::from_str(
            r#"[{"name_value":"api.example.com\n*.example.com\nexample.com",
                 "issuer_name":"C=US, O=Let's Encrypt, CN=R11",
                 "not_after":"2026-03-01T12:00:00"}]"#,
        )
        .unwrap();
        let records = records_from_entries(entries);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].names,
            vec!["api.example.com", "*.example.com", "example.com"]
        );
        assert_eq!(records[0].issuer, "C=US, O=Let's Encrypt, CN=R11");
        assert_eq!(
            records[0].not_after,
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_records_from_entries_tolerates_missing_fields() {
        let entries: Vec<CrtShEntry> =
            serde_json::from_str(r#"[{"name_value":"www.example.com"}]"#).unwrap();
        let records = records_from_entries(entries);
        assert_eq!(records[0].names, vec!["www.example.com"]);
        assert!(records[0].issuer.is_empty());
        assert!(records[0].not_after.is_none());
    }

    #[test]
    fn test_parse_not_after_rejects_garbage() {
        assert!(parse_not_after("not-a-date").is_none());
        assert!(parse_not_after("").is_none());
    }
}
