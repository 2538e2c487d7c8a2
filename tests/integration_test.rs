//! Integration tests for urldedup.
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::too_many_lines
)]

use std::io::Cursor;
use test_case::test_case;
use urldedup::io::{CsvTable, DedupSummary, ReportFormat};
use urldedup::models::{Platform, RawRecord};
use urldedup::services::deduplication::{
    DeduplicationConfig, DeduplicationService, DuplicateReason, similarity_ratio,
};
use urldedup::services::{deduplicate, extract_identity, normalize};
use urldedup::{Error, UrlDedupConfig};

// ============================================================================
// Identity extraction
// ============================================================================

#[test_case("https://www.instagram.com/p/ABC123/?utm_source=fb", Platform::Instagram, "ABC123" ; "instagram post")]
#[test_case("https://instagram.com/reel/Cx_9-z", Platform::Instagram, "Cx_9-z" ; "instagram reel")]
#[test_case("https://instagram.com/tv/TV1", Platform::Instagram, "TV1" ; "instagram tv")]
#[test_case("https://youtube.com/watch?v=XYZ", Platform::YouTube, "XYZ" ; "youtube watch")]
#[test_case("https://www.youtube.com/watch?feature=share&v=XYZ", Platform::YouTube, "XYZ" ; "youtube watch v not first")]
#[test_case("https://youtu.be/dQw4w9WgXcQ?si=abc", Platform::YouTube, "dQw4w9WgXcQ" ; "youtube short link")]
#[test_case("https://youtube.com/shorts/SH0RT", Platform::YouTube, "SH0RT" ; "youtube shorts")]
#[test_case("https://www.tiktok.com/@brand/video/7234567890123", Platform::TikTok, "7234567890123" ; "tiktok video")]
#[test_case("https://vm.tiktok.com/ZMabc123/", Platform::TikTok, "ZMabc123" ; "tiktok vm link")]
#[test_case("https://vt.tiktok.com/ZSxyz/", Platform::TikTok, "ZSxyz" ; "tiktok vt link")]
#[test_case("https://facebook.com/brand/posts/123456", Platform::Facebook, "123456" ; "facebook post")]
#[test_case("https://facebook.com/brand/videos/987", Platform::Facebook, "987" ; "facebook video")]
#[test_case("https://facebook.com/photo.php?fbid=555", Platform::Facebook, "555" ; "facebook photo")]
#[test_case("https://facebook.com/watch/?v=42", Platform::Facebook, "42" ; "facebook watch")]
fn test_identity_extraction(url: &str, platform: Platform, content_id: &str) {
    let identity = extract_identity(url).expect("identity");
    assert_eq!(identity.platform, platform);
    assert_eq!(identity.content_id, content_id);
}

#[test_case("https://example.com/blog/post" ; "plain site")]
#[test_case("https://instagram.com/brand" ; "instagram profile")]
#[test_case("https://tiktok.com/@brand" ; "tiktok profile")]
#[test_case("https://facebook.com/brand/posts/abc" ; "facebook non-numeric id")]
#[test_case("not-a-url-string" ; "free text")]
#[test_case("" ; "empty")]
fn test_identity_unrecognized(url: &str) {
    assert!(extract_identity(url).is_none());
}

// ============================================================================
// Normalization
// ============================================================================

#[test_case("HTTP://www.Example.COM/Path/" => "https://example.com/Path" ; "scheme host case www slash")]
#[test_case("https://example.com/a?b=2&a=1" => "https://example.com/a?a=1&b=2" ; "sorted query")]
#[test_case("https://example.com/a?utm_source=x&FBCLID=y&id=7" => "https://example.com/a?id=7" ; "tracking removed")]
#[test_case("https://example.com/a?utm_source=x" => "https://example.com/a" ; "query emptied")]
#[test_case("https://example.com/a#comments" => "https://example.com/a" ; "fragment dropped")]
#[test_case("https://example.com:8443/a" => "https://example.com:8443/a" ; "port kept")]
#[test_case("https://example.com/a?x=1&x=0" => "https://example.com/a?x=1&x=0" ; "repeated keys keep order")]
#[test_case("  https://example.com/a  " => "https://example.com/a" ; "surrounding whitespace")]
#[test_case("not-a-url-string" => "not-a-url-string" ; "unparseable passes through")]
fn test_normalization(input: &str) -> String {
    normalize(Some(input)).url.expect("judgeable").into_string()
}

#[test]
fn test_blank_and_absent_are_unjudgeable() {
    assert!(normalize(None).url.is_none());
    assert!(normalize(Some("")).url.is_none());
    assert!(normalize(Some(" \t ")).url.is_none());
}

#[test]
fn test_identity_uses_raw_input() {
    // Tracking params are stripped from the normalized form but identity is
    // taken from the trimmed input.
    let result = normalize(Some("  https://youtu.be/XYZ?si=abc  "));
    assert_eq!(result.url.unwrap().as_str(), "https://youtu.be/XYZ");
    assert_eq!(result.identity.unwrap().content_id, "XYZ");
}

// ============================================================================
// Deduplication scenarios
// ============================================================================

fn run(urls: &[Option<&str>], config: DeduplicationConfig) -> urldedup::DedupReport<usize> {
    DeduplicationService::new(config)
        .unwrap()
        .run(RawRecord::from_urls(urls))
}

/// Tracking noise and `www.` collapse both Instagram URLs to one normalized
/// form, so the exact tier catches the second one before the identity tier.
#[test]
fn test_scenario_tracking_variant() {
    let report = run(
        &[
            Some("https://www.instagram.com/p/ABC123/?utm_source=fb"),
            Some("https://instagram.com/p/ABC123"),
        ],
        DeduplicationConfig::default(),
    );

    assert_eq!(report.kept, vec![0]);
    assert_eq!(report.stats.exact_duplicates, 1);
    assert_eq!(report.stats.id_based_duplicates, 0);
    assert_eq!(report.stats.removed_total, 1);
    assert_eq!(report.stats.final_count, 1);
    assert_eq!(report.stats.platform_count(Platform::Instagram), 2);
}

#[test]
fn test_scenario_cross_shape_identity() {
    let report = run(
        &[
            Some("https://youtu.be/XYZ"),
            Some("https://youtube.com/watch?v=XYZ&feature=share"),
        ],
        DeduplicationConfig::default(),
    );

    assert_eq!(report.kept, vec![0]);
    assert_eq!(report.stats.id_based_duplicates, 1);
    assert_eq!(report.outcomes[1].check.reason, Some(DuplicateReason::IdMatch));
}

#[test]
fn test_scenario_case_and_slash() {
    let (kept, stats) = deduplicate(
        RawRecord::from_urls(&[
            Some("https://tiktok.com/@brand/video/1111111111"),
            Some("https://TikTok.com/@brand/video/1111111111/"),
        ]),
        0.90,
        true,
    )
    .unwrap();

    assert_eq!(kept, vec![0]);
    assert_eq!(stats.exact_duplicates, 1);
}

#[test]
fn test_scenario_missing_and_unparseable() {
    let (kept, stats) =
        deduplicate(RawRecord::from_urls(&[None, Some("not-a-url-string")]), 0.90, true).unwrap();

    assert_eq!(kept, vec![0, 1]);
    assert_eq!(stats.removed_total, 0);
    assert_eq!(stats.platform_count(Platform::Unknown), 2);
}

#[test_case(true, 1 ; "similarity enabled")]
#[test_case(false, 0 ; "similarity disabled")]
fn test_scenario_near_duplicate(use_similarity: bool, removed: usize) {
    let a = "https://blog.example.com/articles/brand-launches-summer-collection-2024";
    let b = "https://blog.example.net/articles/brand-launches-summer-collection-2024";
    assert!(similarity_ratio(a, b) >= 0.90);

    let (kept, stats) =
        deduplicate(RawRecord::from_urls(&[Some(a), Some(b)]), 0.90, use_similarity).unwrap();

    assert_eq!(stats.similarity_duplicates, removed);
    assert_eq!(kept.len(), 2 - removed);
}

// The later record is scored against the earlier one, so input order decides.
#[test_case(
    "https://news.example.com/2024/story-video",
    "https://news.example.com/2025/story-event",
    vec![0, 1] ; "story event below threshold"
)]
#[test_case(
    "https://news.example.com/2025/story-event",
    "https://news.example.com/2024/story-video",
    vec![0] ; "story video above threshold"
)]
#[test_case(
    "https://shop.example.com/blog/story-guide",
    "https://shop.example.com/blog/story-review",
    vec![0, 1] ; "story review below threshold"
)]
fn test_similarity_scores_later_record_against_kept(first: &str, second: &str, expected: Vec<usize>) {
    let (kept, stats) =
        deduplicate(RawRecord::from_urls(&[Some(first), Some(second)]), 0.90, true).unwrap();

    assert_eq!(kept, expected);
    assert_eq!(stats.similarity_duplicates, 2 - expected.len());
}

#[test]
fn test_scenario_platform_histogram() {
    let report = run(
        &[
            Some("https://instagram.com/p/A"),
            Some("https://youtu.be/B"),
            Some("https://youtu.be/C"),
            Some("https://tiktok.com/@x/video/1"),
            Some("https://facebook.com/x/posts/2"),
            Some("https://example.com/page"),
            None,
        ],
        DeduplicationConfig::default().with_similarity(false),
    );
    let stats = &report.stats;

    assert_eq!(stats.platform_count(Platform::Instagram), 1);
    assert_eq!(stats.platform_count(Platform::YouTube), 2);
    assert_eq!(stats.platform_count(Platform::TikTok), 1);
    assert_eq!(stats.platform_count(Platform::Facebook), 1);
    assert_eq!(stats.platform_count(Platform::Unknown), 2);
    assert_eq!(stats.platforms.values().sum::<usize>(), stats.total_urls);
}

#[test]
fn test_threshold_one_only_catches_identical() {
    let report = run(
        &[Some("https://example.com/a1"), Some("https://example.com/a2")],
        DeduplicationConfig::default().with_similarity_threshold(1.0),
    );
    assert_eq!(report.kept, vec![0, 1]);
}

#[test_case(1.5 ; "above one")]
#[test_case(-0.1 ; "negative")]
#[test_case(f64::NAN ; "nan")]
fn test_invalid_threshold(threshold: f64) {
    let result = deduplicate(RawRecord::from_urls(&[Some("https://a.example")]), threshold, true);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_empty_input() {
    let (kept, stats) = deduplicate(Vec::<RawRecord<usize>>::new(), 0.9, true).unwrap();
    assert!(kept.is_empty());
    assert_eq!(stats.total_urls, 0);
    assert_eq!(stats.dedup_rate(), 0.0);
}

// ============================================================================
// CSV pipeline
// ============================================================================

#[test]
fn test_csv_pipeline_end_to_end() {
    let csv = "\
post_id,Social URL,likes
a,https://www.instagram.com/p/ABC123/?igshid=x,10
b,https://youtu.be/XYZ,20
c,https://www.youtube.com/watch?v=XYZ,30
d,,40
e,https://instagram.com/p/ABC123,50
";
    let table = CsvTable::read(Cursor::new(csv)).unwrap();
    let column = table.resolve_url_column(None).unwrap();
    assert_eq!(column, "Social URL");

    let config = UrlDedupConfig::default();
    let report = DeduplicationService::new(config.dedup.clone())
        .unwrap()
        .run(table.records(&column).unwrap());
    assert_eq!(report.kept, vec![0, 1, 3]);

    let mut kept = Vec::new();
    table.write_kept(&mut kept, &report.kept).unwrap();
    assert_eq!(
        String::from_utf8(kept).unwrap(),
        "post_id,Social URL,likes\n\
         a,https://www.instagram.com/p/ABC123/?igshid=x,10\n\
         b,https://youtu.be/XYZ,20\n\
         d,,40\n"
    );

    let mut removed = Vec::new();
    table.write_removed(&mut removed, &report.outcomes).unwrap();
    let removed = String::from_utf8(removed).unwrap();
    assert!(removed.contains("c,https://www.youtube.com/watch?v=XYZ,30,id_match,1\n"));
    assert!(removed.contains("e,https://instagram.com/p/ABC123,50,exact_match,0\n"));

    let summary = DedupSummary::new(column, &config.dedup, report.stats);
    let json: serde_json::Value =
        serde_json::from_str(&summary.render(ReportFormat::Json).unwrap()).unwrap();
    assert_eq!(json["total_urls"], 5);
    assert_eq!(json["removed_total"], 2);
    assert_eq!(json["platforms"]["instagram"], 2);
    assert_eq!(json["platforms"]["unknown"], 1);
}

#[test]
fn test_csv_pipeline_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("links.csv");
    std::fs::write(
        &input,
        "link\nhttps://facebook.com/brand/posts/1\nhttps://www.facebook.com/brand/posts/1?fbclid=z\n",
    )
    .unwrap();

    let mut out = Vec::new();
    let summary = urldedup::cli::CleanCommand::new(&input)
        .execute(&UrlDedupConfig::default(), &mut out)
        .unwrap();

    assert_eq!(summary.stats.final_count, 1);
    let kept = std::fs::read_to_string(dir.path().join("links_deduplicated.csv")).unwrap();
    assert_eq!(kept, "link\nhttps://facebook.com/brand/posts/1\n");
}
