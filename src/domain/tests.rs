// Domain module tests.

use super::*;
use chrono::{TimeZone, Utc};

fn record(names: &[&str]) -> CertificateRecord {
    CertificateRecord {
        names: names.iter().map(|n| n.to_string()).collect(),
        issuer: String::new(),
        not_after: None,
    }
}

#[test]
fn test_normalize_domain_basic() {
    assert_eq!(normalize_domain("Example.COM").unwrap(), "example.com");
}

#[test]
fn test_normalize_domain_trims_and_strips_trailing_dot() {
    assert_eq!(normalize_domain("  example.com.\n").unwrap(), "example.com");
}

#[test]
fn test_normalize_domain_rejects_empty() {
    assert!(normalize_domain("").is_err());
    assert!(normalize_domain("   ").is_err());
    // A lone dot normalizes to the empty string
    assert!(normalize_domain(".").is_err());
}

#[test]
fn test_normalize_domain_rejects_invalid_shapes() {
    assert!(normalize_domain("exa mple.com").is_err());
    assert!(normalize_domain("-example.com").is_err());
    assert!(normalize_domain("example-.com").is_err());
    assert!(normalize_domain("exam_ple.com").is_err());
    assert!(normalize_domain("example..com").is_err());
}

#[test]
fn test_is_valid_domain_label_limits() {
    let long_label = "a".repeat(63);
    assert!(is_valid_domain(&format!("{long_label}.com")));
    let too_long_label = "a".repeat(64);
    assert!(!is_valid_domain(&format!("{too_long_label}.com")));
    // Total length over 253 characters
    let long_name = format!("{}.com", "a.".repeat(130));
    assert!(!is_valid_domain(&long_name));
}

#[test]
fn test_collect_candidates_dedupes_and_suffix_matches() {
    let records = vec![
        record(&["api.example.com", "www.example.com"]),
        record(&["API.EXAMPLE.COM.", "example.com"]),
        // Unrelated domains sharing a certificate must be rejected
        record(&["api.other.org", "notexample.com", "evil-example.com"]),
    ];
    let set = collect_candidates("example.com", &records);
    let names: Vec<&str> = set.names.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["api.example.com", "example.com", "www.example.com"]);
    // Every candidate is the domain itself or a dot-suffix match
    for name in set.names.keys() {
        assert!(name == "example.com" || name.ends_with(".example.com"));
    }
}

#[test]
fn test_collect_candidates_wildcard_apex_sets_flag() {
    let with_wildcard = collect_candidates(
        "example.com",
        &[record(&["*.example.com", "api.example.com"])],
    );
    assert!(with_wildcard.has_wildcard);

    let without_wildcard =
        collect_candidates("example.com", &[record(&["api.example.com"])]);
    assert!(!without_wildcard.has_wildcard);
}

#[test]
fn test_wildcard_entry_is_not_a_candidate() {
    let set = collect_candidates("example.com", &[record(&["*.example.com"])]);
    assert!(set.has_wildcard);
    assert!(set.names.is_empty());
}

#[test]
fn test_sub_wildcard_does_not_set_flag() {
    // Exact-apex policy: *.sub.example.com is not apex wildcard coverage,
    // and its stripped remainder is not promoted to a candidate either.
    let set = collect_candidates("example.com", &[record(&["*.staging.example.com"])]);
    assert!(!set.has_wildcard);
    assert!(set.names.is_empty());
}

#[test]
fn test_literal_reissue_of_wildcard_covered_name_is_kept() {
    let set = collect_candidates(
        "example.com",
        &[record(&["*.example.com"]), record(&["app.example.com"])],
    );
    assert!(set.has_wildcard);
    assert!(set.names.contains_key("app.example.com"));
}

#[test]
fn test_garbage_names_discarded() {
    let set = collect_candidates(
        "example.com",
        &[record(&[
            "admin@example.com",
            "a b.example.com",
            "ex*mple.example.com",
            "",
        ])],
    );
    assert!(set.names.is_empty());
}

#[test]
fn test_collect_candidates_order_independent() {
    let a = record(&["b.example.com", "a.example.com"]);
    let b = record(&["c.example.com", "*.example.com"]);
    let forward = collect_candidates("example.com", &[a.clone(), b.clone()]);
    let reverse = collect_candidates("example.com", &[b, a]);
    assert_eq!(forward, reverse);
}

#[test]
fn test_hint_merge_prefers_latest_expiry() {
    let older = CertificateRecord {
        names: vec!["api.example.com".to_string()],
        issuer: "Old CA".to_string(),
        not_after: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
    };
    let newer = CertificateRecord {
        names: vec!["api.example.com".to_string()],
        issuer: "New CA".to_string(),
        not_after: Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()),
    };

    // Either feed order lands on the newer hint
    let forward = collect_candidates("example.com", &[older.clone(), newer.clone()]);
    let reverse = collect_candidates("example.com", &[newer, older]);
    for set in [forward, reverse] {
        let hint = &set.names["api.example.com"];
        assert_eq!(hint.issuer, "New CA");
        assert_eq!(
            hint.not_after,
            Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap())
        );
    }
}

#[test]
fn test_hint_merge_dated_beats_undated() {
    let undated = CertificateRecord {
        names: vec!["api.example.com".to_string()],
        issuer: "Undated CA".to_string(),
        not_after: None,
    };
    let dated = CertificateRecord {
        names: vec!["api.example.com".to_string()],
        issuer: "Dated CA".to_string(),
        not_after: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
    };
    let set = collect_candidates("example.com", &[dated, undated]);
    assert_eq!(set.names["api.example.com"].issuer, "Dated CA");
}
