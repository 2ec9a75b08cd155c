//! Leaf-certificate field extraction.

use chrono::{DateTime, Utc};
use x509_parser::certificate::X509Certificate;

/// Extracts the issuer's CommonName, falling back to the full issuer
/// distinguished name when no CN attribute is present (some CAs omit it).
pub(crate) fn issuer_name(cert: &X509Certificate<'_>) -> String {
    cert.issuer()
        .iter_common_name()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(|cn| cn.to_string())
        .unwrap_or_else(|| cert.issuer().to_string())
}

/// Converts the certificate's `NotAfter` to a UTC timestamp.
///
/// Bridged through RFC 2822 text, the one rendering `ASN1Time` and
/// `chrono` agree on.
pub(crate) fn not_after_utc(cert: &X509Certificate<'_>) -> Option<DateTime<Utc>> {
    cert.validity()
        .not_after
        .to_rfc2822()
        .ok()
        .and_then(|raw| DateTime::parse_from_rfc2822(&raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
