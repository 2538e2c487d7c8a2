//! Social platform tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Social platforms whose URLs carry an extractable content identity.
///
/// `Unknown` is the bucket for URLs that matched no platform rule. It never
/// appears inside an [`Identity`](super::Identity).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Instagram posts, reels, and IGTV.
    Instagram,
    /// YouTube videos and shorts.
    #[serde(rename = "youtube")]
    YouTube,
    /// TikTok videos.
    #[serde(rename = "tiktok")]
    TikTok,
    /// Facebook posts, videos, and photos.
    Facebook,
    /// No platform rule matched.
    #[default]
    Unknown,
}

impl Platform {
    /// Returns the platform as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::YouTube => "youtube",
            Self::TikTok => "tiktok",
            Self::Facebook => "facebook",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true for every variant except `Unknown`.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
