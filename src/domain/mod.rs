//! Domain name validation and candidate collection.
//!
//! This module turns raw CT certificate records into the scan's working set:
//! - `normalize_domain()` - validates and canonicalizes the requested domain
//! - `collect_candidates()` - normalizes, filters, and deduplicates names,
//!   and detects wildcard coverage
//!
//! Candidate collection is deterministic: the same records produce the same
//! `CandidateSet` regardless of input ordering.

use std::collections::BTreeMap;

use crate::error_handling::ScanError;
use crate::models::{CertHint, CertificateRecord};

/// The normalized working set for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    /// Candidate name -> cert hint, keyed and iterated in lexicographic
    /// order. Every key equals the scan domain or ends with `.{domain}`.
    pub names: BTreeMap<String, CertHint>,
    /// True iff a record contained a name of exactly `*.{domain}`.
    pub has_wildcard: bool,
}

/// Validates and canonicalizes the requested scan domain.
///
/// Lowercases, trims surrounding whitespace, and strips a single trailing
/// dot. Returns `ScanError::InvalidDomain` if the remainder is not a
/// syntactically valid DNS name.
pub fn normalize_domain(domain: &str) -> Result<String, ScanError> {
    let normalized = domain.trim().to_lowercase();
    let normalized = normalized.strip_suffix('.').unwrap_or(&normalized);
    if normalized.is_empty() || !is_valid_domain(normalized) {
        return Err(ScanError::InvalidDomain(domain.trim().to_string()));
    }
    Ok(normalized.to_string())
}

/// Checks RFC-1035 shape: total length <= 253, labels 1-63 chars of
/// `[a-z0-9-]` with no leading or trailing hyphen.
///
/// Expects lowercase input; uppercase letters are rejected so callers
/// normalize first.
pub fn is_valid_domain(name: &str) -> bool {
    if name.is_empty() || name.len() > 253 {
        return false;
    }
    name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    })
}

/// Collects the candidate set for `domain` from raw CT records.
///
/// For each name in each record:
/// - lowercase, trim, strip one trailing dot;
/// - `*.{domain}` exactly sets the wildcard flag and is not itself a
///   candidate (a wildcard entry is not a browsable host);
/// - other wildcard names (`*.x.{domain}`) are stripped for membership
///   testing only and never promoted to candidates;
/// - anything still containing `*`, `@`, or whitespace is discarded (CT
///   entries contain plenty of garbage);
/// - the name must equal `domain` or end with `.{domain}` and be a valid
///   DNS name, defending against unrelated domains sharing a certificate.
///
/// Duplicates collapse into one candidate. When several records cover the
/// same name, the hint from the record with the latest `not_after` wins,
/// which keeps the merge independent of record order.
pub fn collect_candidates(domain: &str, records: &[CertificateRecord]) -> CandidateSet {
    let mut set = CandidateSet::default();
    let wildcard_apex = format!("*.{domain}");
    let suffix = format!(".{domain}");

    for record in records {
        for raw in &record.names {
            let name = raw.trim().to_lowercase();
            let name = name.strip_suffix('.').unwrap_or(&name);

            if let Some(stripped) = name.strip_prefix("*.") {
                if name == wildcard_apex {
                    set.has_wildcard = true;
                } else if !in_scope(stripped, domain, &suffix) {
                    log::debug!("ignoring out-of-scope wildcard entry: {name}");
                }
                // Wildcard-origin names are never candidates; a concrete
                // reissue of the literal name has to appear on its own.
                continue;
            }

            if name.contains('*') || name.contains('@') || name.contains(char::is_whitespace) {
                continue;
            }
            if !in_scope(name, domain, &suffix) || !is_valid_domain(name) {
                continue;
            }

            let hint = CertHint {
                issuer: record.issuer.clone(),
                not_after: record.not_after,
            };
            match set.names.get_mut(name) {
                Some(existing) => merge_hint(existing, hint),
                None => {
                    set.names.insert(name.to_string(), hint);
                }
            }
        }
    }

    set
}

fn in_scope(name: &str, domain: &str, suffix: &str) -> bool {
    name == domain || name.ends_with(suffix)
}

/// Keeps whichever hint carries the later expiry; a dated hint always beats
/// an undated one. Ties keep the incumbent unless it lacks an issuer.
fn merge_hint(existing: &mut CertHint, incoming: CertHint) {
    let replace = match (existing.not_after, incoming.not_after) {
        (Some(current), Some(candidate)) => candidate > current,
        (None, Some(_)) => true,
        (Some(_), None) => false,
        (None, None) => existing.issuer.is_empty() && !incoming.issuer.is_empty(),
    };
    if replace {
        *existing = incoming;
    }
}

#[cfg(test)]
mod tests;
