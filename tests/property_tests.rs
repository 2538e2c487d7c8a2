//! Property-based tests for URL normalization and deduplication.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Normalization is idempotent
//! - Tracking parameters never affect the normalized form
//! - Query parameter order never affects the normalized form
//! - Identity extraction is deterministic and total
//! - Deduplication accounts for every record and keeps first occurrences

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use std::collections::BTreeMap;
use urldedup::models::{Platform, RawRecord};
use urldedup::services::deduplication::{DeduplicationConfig, DeduplicationService};
use urldedup::services::{TRACKING_PARAMS, extract_identity, normalize};

// ============================================================================
// Strategies
// ============================================================================

/// Scheme, optional `www.`, and a host whose labels never spell `www`.
fn base_url() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["http", "https", "HTTP", "HtTpS"]),
        prop::bool::ANY,
        "[a-v]{1,10}",
        prop::sample::select(vec!["com", "net", "org", "io"]),
        "(/[A-Za-z0-9_-]{1,8}){0,3}",
        prop::bool::ANY,
    )
        .prop_map(|(scheme, www, host, tld, path, slash)| {
            let www = if www { "www." } else { "" };
            let slash = if slash { "/" } else { "" };
            format!("{scheme}://{www}{host}.{tld}{path}{slash}")
        })
}

/// Distinct non-tracking query keys with simple values.
fn query_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("q[a-z]{0,4}", "[a-z0-9]{0,5}", 0..5)
        .prop_map(|map: BTreeMap<String, String>| map.into_iter().collect())
}

fn tracking_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (prop::sample::select(TRACKING_PARAMS.to_vec()), "[a-z0-9]{1,6}"),
        1..4,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    })
}

fn with_query(base: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return base.to_string();
    }
    let query: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{base}?{}", query.join("&"))
}

fn normalized(url: &str) -> String {
    normalize(Some(url)).url.unwrap().into_string()
}

/// A small pool so that random batches contain real duplicates.
fn pooled_url() -> impl Strategy<Value = Option<String>> {
    prop::option::weighted(
        0.9,
        prop::sample::select(vec![
            "https://www.instagram.com/p/ABC123/?utm_source=fb",
            "https://instagram.com/reel/ABC123",
            "https://youtu.be/XYZ",
            "https://youtube.com/watch?v=XYZ&feature=share",
            "https://youtube.com/shorts/XYZ",
            "https://tiktok.com/@brand/video/1111111111",
            "https://facebook.com/brand/posts/123456",
            "https://blog.example.com/articles/brand-launches-summer-collection-2024",
            "https://blog.example.net/articles/brand-launches-summer-collection-2024",
            "not-a-url-string",
            "   ",
        ])
        .prop_map(String::from),
    )
}

// ============================================================================
// Normalizer
// ============================================================================

proptest! {
    /// Property: normalizing a normalized URL changes nothing.
    #[test]
    fn prop_normalization_is_idempotent(base in base_url(), pairs in query_pairs()) {
        let once = normalized(&with_query(&base, &pairs));
        let twice = normalized(&once);
        prop_assert_eq!(once, twice);
    }

    /// Property: tracking parameters do not reach the normalized form.
    #[test]
    fn prop_tracking_params_are_ignored(
        base in base_url(),
        pairs in query_pairs(),
        tracking in tracking_pairs(),
    ) {
        let clean = normalized(&with_query(&base, &pairs));

        let mut noisy_pairs = tracking.clone();
        noisy_pairs.extend(pairs);
        let noisy = normalized(&with_query(&base, &noisy_pairs));

        prop_assert_eq!(clean, noisy);
    }

    /// Property: tracking keys are matched case-insensitively.
    #[test]
    fn prop_tracking_params_ignore_case(base in base_url(), tracking in tracking_pairs()) {
        let upper: Vec<_> = tracking
            .iter()
            .map(|(k, v)| (k.to_uppercase(), v.clone()))
            .collect();
        prop_assert_eq!(normalized(&base), normalized(&with_query(&base, &upper)));
    }

    /// Property: query parameter order does not matter.
    #[test]
    fn prop_query_order_is_irrelevant(base in base_url(), pairs in query_pairs()) {
        let mut reversed = pairs.clone();
        reversed.reverse();
        prop_assert_eq!(
            normalized(&with_query(&base, &pairs)),
            normalized(&with_query(&base, &reversed))
        );
    }

    /// Property: the normalized form of a parsed URL is always https.
    #[test]
    fn prop_scheme_is_https(base in base_url()) {
        prop_assert!(normalized(&base).starts_with("https://"));
    }
}

// ============================================================================
// Identity extractor
// ============================================================================

proptest! {
    /// Property: extraction is deterministic and never panics.
    #[test]
    fn prop_identity_is_deterministic(s in "\\PC{0,80}") {
        prop_assert_eq!(extract_identity(&s), extract_identity(&s));
    }

    /// Property: an extracted identity always has a known platform and an id.
    #[test]
    fn prop_identity_is_well_formed(s in "(https://)?(www\\.)?(youtu\\.be|instagram\\.com/p|vm\\.tiktok\\.com)/[A-Za-z0-9_-]{0,12}") {
        if let Some(identity) = extract_identity(&s) {
            prop_assert!(identity.platform.is_known());
            prop_assert!(!identity.content_id.is_empty());
        }
    }

    /// Property: short links and watch URLs for the same video share an identity.
    #[test]
    fn prop_youtube_shapes_agree(id in "[A-Za-z0-9_-]{1,11}", noise in "[a-z]{1,6}") {
        let short = extract_identity(&format!("https://youtu.be/{id}?si={noise}"));
        let watch = extract_identity(&format!("https://www.youtube.com/watch?feature={noise}&v={id}"));
        prop_assert_eq!(&short, &watch);
        prop_assert_eq!(short.map(|i| i.content_id), Some(id));
    }
}

// ============================================================================
// Deduplication engine
// ============================================================================

proptest! {
    /// Property: every record is either kept or counted as removed.
    #[test]
    fn prop_kept_plus_removed_is_total(
        urls in prop::collection::vec(pooled_url(), 0..40),
        threshold in 0.5f64..=1.0,
        use_similarity in prop::bool::ANY,
    ) {
        let config = DeduplicationConfig::default()
            .with_similarity_threshold(threshold)
            .with_similarity(use_similarity);
        let report = DeduplicationService::new(config)
            .unwrap()
            .run(RawRecord::from_urls(&urls));
        let stats = &report.stats;

        prop_assert_eq!(stats.total_urls, urls.len());
        prop_assert_eq!(report.kept.len() + stats.removed_total, stats.total_urls);
        prop_assert_eq!(
            stats.removed_total,
            stats.exact_duplicates + stats.id_based_duplicates + stats.similarity_duplicates
        );
        prop_assert_eq!(stats.platforms.values().sum::<usize>(), stats.total_urls);
        if !use_similarity {
            prop_assert_eq!(stats.similarity_duplicates, 0);
        }
    }

    /// Property: removed records always point at an earlier kept record.
    #[test]
    fn prop_first_seen_wins(urls in prop::collection::vec(pooled_url(), 1..40)) {
        let report = DeduplicationService::new(DeduplicationConfig::default())
            .unwrap()
            .run(RawRecord::from_urls(&urls));

        prop_assert_eq!(report.kept.first(), Some(&0));
        prop_assert!(report.kept.windows(2).all(|w| w[0] < w[1]));

        for outcome in report.removed() {
            let matched = outcome.check.matched_record.unwrap();
            prop_assert!(matched < outcome.id);
            prop_assert!(report.kept.contains(&matched));
        }
    }

    /// Property: records without a URL are always kept and counted as unknown.
    #[test]
    fn prop_missing_urls_are_kept(urls in prop::collection::vec(pooled_url(), 0..30)) {
        let report = DeduplicationService::new(DeduplicationConfig::default())
            .unwrap()
            .run(RawRecord::from_urls(&urls));

        for outcome in report.outcomes.iter().filter(|o| o.is_unjudgeable()) {
            prop_assert!(outcome.is_kept());
            prop_assert_eq!(outcome.platform, Platform::Unknown);
        }
    }
}
