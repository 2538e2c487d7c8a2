//! Platform identity extraction.
//!
//! Recognizes the URL shapes that social platforms use for individual posts
//! and pulls out the `(platform, content_id)` pair. Two URLs with the same
//! identity refer to the same content even when their hosts, paths, or query
//! strings differ (`youtu.be/X` and `youtube.com/watch?v=X`).
//!
//! Rules live in a static table and are tried in table order; the first rule
//! that matches wins. Host matching is case-sensitive on the literal input.

use crate::models::{Identity, Platform};
use regex::Regex;
use std::sync::LazyLock;

/// One extraction rule: a pattern whose first capture group is the content id.
#[derive(Debug, Clone, Copy)]
pub struct IdentityRule {
    /// Rule name, used in logs and tests.
    pub name: &'static str,
    /// Platform assigned when the rule matches.
    pub platform: Platform,
    /// Regular expression with the content id in capture group 1.
    pub pattern: &'static str,
}

/// Extraction rules in priority order.
pub const IDENTITY_RULES: &[IdentityRule] = &[
    IdentityRule {
        name: "instagram_post",
        platform: Platform::Instagram,
        pattern: r"instagram\.com/(?:p|reel|tv)/([A-Za-z0-9_-]+)",
    },
    IdentityRule {
        name: "youtube_watch",
        platform: Platform::YouTube,
        pattern: r"youtube\.com/watch\?(?:[^#]*?&)?v=([A-Za-z0-9_-]+)",
    },
    IdentityRule {
        name: "youtube_short_link",
        platform: Platform::YouTube,
        pattern: r"youtu\.be/([A-Za-z0-9_-]+)",
    },
    IdentityRule {
        name: "youtube_shorts",
        platform: Platform::YouTube,
        pattern: r"youtube\.com/shorts/([A-Za-z0-9_-]+)",
    },
    IdentityRule {
        name: "tiktok_video",
        platform: Platform::TikTok,
        pattern: r"tiktok\.com/@[^/]+/video/([0-9]+)",
    },
    IdentityRule {
        name: "tiktok_short_link",
        platform: Platform::TikTok,
        pattern: r"(?:vm|vt)\.tiktok\.com/([A-Za-z0-9]+)",
    },
    IdentityRule {
        name: "facebook_post",
        platform: Platform::Facebook,
        pattern: r"facebook\.com/[^/]+/(?:posts|videos)/([0-9]+)",
    },
    IdentityRule {
        name: "facebook_photo",
        platform: Platform::Facebook,
        pattern: r"facebook\.com/photo\.php\?fbid=([0-9]+)",
    },
    IdentityRule {
        name: "facebook_watch",
        platform: Platform::Facebook,
        pattern: r"facebook\.com/watch/?\?v=([0-9]+)",
    },
];

// Patterns are static; a rule that fails to compile is logged and skipped.
static COMPILED_RULES: LazyLock<Vec<(&'static IdentityRule, Regex)>> = LazyLock::new(|| {
    IDENTITY_RULES
        .iter()
        .filter_map(|rule| match Regex::new(rule.pattern) {
            Ok(regex) => Some((rule, regex)),
            Err(e) => {
                tracing::error!(rule = rule.name, error = %e, "Invalid identity rule pattern");
                None
            },
        })
        .collect()
});

/// Extracts the platform content identity from a URL.
///
/// Pure and total: unrecognized input yields `None`, never an error.
///
/// # Example
///
/// ```rust
/// use urldedup::models::Platform;
/// use urldedup::services::extract_identity;
///
/// let id = extract_identity("https://youtu.be/dQw4w9WgXcQ").unwrap();
/// assert_eq!(id.platform, Platform::YouTube);
/// assert_eq!(id.content_id, "dQw4w9WgXcQ");
///
/// assert!(extract_identity("https://example.com/blog/post").is_none());
/// ```
#[must_use]
pub fn extract_identity(url: &str) -> Option<Identity> {
    matching_rule(url).and_then(|(rule, content_id)| Identity::new(rule.platform, content_id))
}

/// Returns the first rule matching `url` and the captured content id.
#[must_use]
pub fn matching_rule(url: &str) -> Option<(&'static IdentityRule, &str)> {
    COMPILED_RULES.iter().find_map(|(rule, regex)| {
        regex
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| (*rule, m.as_str()))
    })
}
