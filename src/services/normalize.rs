//! URL normalization.
//!
//! Reduces a raw URL string to a canonical form so that trivially different
//! spellings of the same link compare equal:
//!
//! - scheme forced to `https`
//! - host lowercased, one leading `www.` removed
//! - trailing `/` removed from the path, path case preserved
//! - fragment dropped
//! - tracking query parameters removed, remaining pairs sorted by key
//!
//! Normalization never fails. Input the URL parser rejects is passed through
//! trimmed but otherwise unchanged, and still carries whatever platform
//! identity the extractor found in it.

use crate::models::{Identity, Platform};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use url::Url;

use super::identity::extract_identity;

/// Scheme every canonical URL is rewritten to.
pub const CANONICAL_SCHEME: &str = "https";

/// Query keys that carry no content-identifying information.
///
/// Matched case-insensitively against each query key.
pub const TRACKING_PARAMS: &[&str] = &[
    // UTM
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    // Facebook
    "fbclid",
    "fb_action_ids",
    "fb_action_types",
    "fb_source",
    "fb_ref",
    // Instagram
    "igshid",
    "igsh",
    "ig_rid",
    "ig_web_copy_link",
    // TikTok
    "tt_from",
    "_r",
    "_d",
    "is_from_webapp",
    "is_copy_url",
    // YouTube and ads
    "feature",
    "gclid",
    "si",
    // Generic
    "ref",
    "source",
    "campaign_id",
    "ad_id",
    "share_id",
    "sender_device",
    "timestamp",
    "_branch_match_id",
    "mibextid",
];

/// Returns true if `key` is a tracking parameter.
#[must_use]
pub fn is_tracking_param(key: &str) -> bool {
    let key = key.to_lowercase();
    TRACKING_PARAMS.contains(&key.as_str())
}

/// A URL reduced to its comparison form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedUrl {
    value: String,
    canonical: bool,
}

impl NormalizedUrl {
    /// Wraps a fully canonicalized URL.
    fn canonical(value: String) -> Self {
        Self {
            value,
            canonical: true,
        }
    }

    /// Wraps trimmed input the parser could not handle.
    fn passthrough(value: &str) -> Self {
        Self {
            value: value.to_string(),
            canonical: false,
        }
    }

    /// Returns the comparison string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns false when parsing failed and the value is the trimmed input.
    #[must_use]
    pub const fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// Consumes the wrapper and returns the comparison string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Result of normalizing one raw URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Normalization {
    /// Comparison form, or `None` when the input cannot be judged at all.
    pub url: Option<NormalizedUrl>,
    /// Platform identity found in the trimmed input.
    pub identity: Option<Identity>,
}

impl Normalization {
    /// The "always keep" result for absent or blank input.
    #[must_use]
    pub const fn unjudgeable() -> Self {
        Self {
            url: None,
            identity: None,
        }
    }

    /// Returns the identity's platform, `Unknown` when no identity was found.
    #[must_use]
    pub fn platform(&self) -> Platform {
        Identity::platform_of(self.identity.as_ref())
    }
}

/// Normalizes a raw URL and extracts its platform identity.
///
/// # Example
///
/// ```rust
/// use urldedup::services::normalize;
///
/// let result = normalize(Some("HTTP://www.Example.com/Path/?utm_source=x&b=2&a=1#top"));
/// let url = result.url.unwrap();
/// assert_eq!(url.as_str(), "https://example.com/Path?a=1&b=2");
/// assert!(result.identity.is_none());
///
/// assert!(normalize(None).url.is_none());
/// ```
#[must_use]
pub fn normalize(raw: Option<&str>) -> Normalization {
    let Some(raw) = raw else {
        return Normalization::unjudgeable();
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Normalization::unjudgeable();
    }

    let identity = extract_identity(trimmed);

    let url = canonicalize(trimmed).map_or_else(
        || {
            tracing::trace!(url = trimmed, "URL not parseable, passing through");
            NormalizedUrl::passthrough(trimmed)
        },
        NormalizedUrl::canonical,
    );

    Normalization {
        url: Some(url),
        identity,
    }
}

/// Builds the canonical string, or `None` if `input` has no parseable host.
fn canonicalize(input: &str) -> Option<String> {
    let parsed = Url::parse(input).ok()?;
    let host = parsed.host_str().filter(|h| !h.is_empty())?;

    let mut out = String::with_capacity(input.len());
    out.push_str(CANONICAL_SCHEME);
    out.push_str("://");
    out.push_str(&authority(&parsed, host));
    out.push_str(parsed.path().trim_end_matches('/'));

    let query = canonical_query(&parsed);
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query);
    }

    Some(out)
}

/// Lowercased `[user[:pass]@]host[:port]` with one leading `www.` removed.
fn authority(parsed: &Url, host: &str) -> String {
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let mut authority = String::new();
    if !parsed.username().is_empty() {
        authority.push_str(&parsed.username().to_lowercase());
        if let Some(password) = parsed.password() {
            authority.push(':');
            authority.push_str(&password.to_lowercase());
        }
        authority.push('@');
    }
    authority.push_str(host);
    if let Some(port) = parsed.port() {
        authority.push(':');
        authority.push_str(&port.to_string());
    }
    authority
}

/// Filters tracking keys and sorts the remaining pairs by key.
///
/// The sort is stable, so repeated keys keep their relative value order.
fn canonical_query(parsed: &Url) -> String {
    let mut pairs: Vec<(Cow<'_, str>, Cow<'_, str>)> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .collect();

    if pairs.is_empty() {
        return String::new();
    }

    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
