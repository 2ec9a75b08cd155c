//! Error type definitions.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    #[allow(dead_code)] // Reserved for resolver configs that can fail
    DnsResolverError(String),
}

/// Failures that abort a scan or are surfaced at the HTTP boundary.
///
/// Per-item failures (a name that does not resolve, a probe that is
/// refused) are deliberately not represented here: they degrade to empty
/// fields on the affected item and never abort the batch.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The requested domain is not a syntactically valid DNS name.
    #[error("invalid domain: {0:?}")]
    InvalidDomain(String),

    /// Every configured Certificate Transparency source failed. Without CT
    /// data there are no candidates to enrich, so the scan cannot proceed.
    #[error("certificate transparency sources unavailable: {0}")]
    SourceUnavailable(String),

    /// The scan deadline elapsed before any result was assembled.
    #[error("scan deadline exceeded before any results were assembled")]
    DeadlineExceeded,
}

/// Per-stage failure categories tracked during a scan.
///
/// These count recoverable, per-item failures for reporting; they are not
/// surfaced as errors to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// A CT source query failed (after retries).
    CtSourceError,
    /// DNS resolution failed for a candidate name (transport failure or
    /// timeout; NXDOMAIN is a normal empty answer, not an error).
    DnsResolutionError,
    /// An IP ownership lookup failed.
    AttributionError,
    /// A TLS probe failed (connect, handshake, or certificate parse).
    TlsProbeError,
    /// The overall scan deadline fired with enrichment still in flight.
    ScanDeadlineExceeded,
}

impl ErrorType {
    /// Short label used in the status endpoint and summary logs.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorType::CtSourceError => "ct_source",
            ErrorType::DnsResolutionError => "dns_resolution",
            ErrorType::AttributionError => "attribution",
            ErrorType::TlsProbeError => "tls_probe",
            ErrorType::ScanDeadlineExceeded => "scan_deadline",
        }
    }
}
