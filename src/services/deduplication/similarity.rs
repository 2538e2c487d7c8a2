//! Similarity deduplication checker.
//!
//! Detects near-duplicate URLs by comparing normalized strings
//! character by character. The score is the Ratcliff/Obershelp ratio
//! `2 * M / T`: `M` counts the characters in the matching blocks found by
//! repeatedly taking the longest common substring and recursing on both
//! sides of it, and `T` is the combined length of both strings.
//!
//! A candidate is compared against every kept URL in the order the URLs were
//! kept, and the first comparison that reaches the threshold wins. There is no
//! best-match search: when several kept URLs qualify, the earliest one is
//! reported. Each check is linear in the number of kept URLs, so a full run is
//! quadratic in the worst case.

use std::collections::HashMap;

use super::config::DeduplicationConfig;

/// Second strings at least this long ignore characters that make up more
/// than 1% of them when seeding a match.
const POPULAR_MIN_LEN: usize = 200;

/// Computes the similarity ratio of `candidate` against `kept` in `[0, 1]`.
///
/// The ratio is not symmetric: matching blocks are searched left to right
/// in `candidate` against the positions indexed from `kept`, so swapping the
/// arguments can change the score. Returns `1.0` exactly when the strings
/// are equal (including two empty strings).
///
/// # Example
///
/// ```rust
/// use urldedup::services::deduplication::similarity_ratio;
///
/// assert!((similarity_ratio("abcd", "abcd") - 1.0).abs() < f64::EPSILON);
/// assert!((similarity_ratio("abcd", "abce") - 0.75).abs() < 1e-9);
/// assert!(similarity_ratio("abc", "xyz").abs() < f64::EPSILON);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn similarity_ratio(candidate: &str, kept: &str) -> f64 {
    if candidate == kept {
        return 1.0;
    }

    let a: Vec<char> = candidate.chars().collect();
    let b: Vec<char> = kept.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    (2 * matched_chars(&a, &b)) as f64 / total as f64
}

/// A common run `a[a_start..a_start + size] == b[b_start..b_start + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    a_start: usize,
    b_start: usize,
    size: usize,
}

/// Total size of the matching blocks between `a` and `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let positions = index_positions(b);
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let block = longest_match(a, b, &positions, (a_lo, a_hi), (b_lo, b_hi));
        if block.size == 0 {
            continue;
        }
        matched += block.size;
        if a_lo < block.a_start && b_lo < block.b_start {
            pending.push((a_lo, block.a_start, b_lo, block.b_start));
        }
        let (a_end, b_end) = (block.a_start + block.size, block.b_start + block.size);
        if a_end < a_hi && b_end < b_hi {
            pending.push((a_end, a_hi, b_end, b_hi));
        }
    }

    matched
}

/// Maps each character of `b` to its ascending positions, dropping popular
/// characters of long strings.
fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        positions.entry(c).or_default().push(j);
    }
    if b.len() >= POPULAR_MIN_LEN {
        let limit = b.len() / 100 + 1;
        positions.retain(|_, at| at.len() <= limit);
    }
    positions
}

/// Longest common run inside `a[a_range]` and `b[b_range]`.
///
/// Ties go to the earliest start in `a`, then the earliest start in `b`. The
/// run found from indexed characters is then widened over equal neighbours,
/// which lets it absorb popular characters left out of the index.
fn longest_match(
    a: &[char],
    b: &[char],
    positions: &HashMap<char, Vec<usize>>,
    (a_lo, a_hi): (usize, usize),
    (b_lo, b_hi): (usize, usize),
) -> Block {
    let mut best = Block {
        a_start: a_lo,
        b_start: b_lo,
        size: 0,
    };
    // Length of the run ending at each `b` position for the previous `a` char.
    let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

    for (offset, c) in a[a_lo..a_hi].iter().enumerate() {
        let i = a_lo + offset;
        let mut next: HashMap<usize, usize> = HashMap::new();
        for &j in positions.get(c).map_or(&[][..], Vec::as_slice) {
            if j < b_lo {
                continue;
            }
            if j >= b_hi {
                break;
            }
            let size = j
                .checked_sub(1)
                .and_then(|prev| run_ending_at.get(&prev))
                .copied()
                .unwrap_or(0)
                + 1;
            next.insert(j, size);
            if size > best.size {
                best = Block {
                    a_start: i + 1 - size,
                    b_start: j + 1 - size,
                    size,
                };
            }
        }
        run_ending_at = next;
    }

    while best.a_start > a_lo && best.b_start > b_lo && a[best.a_start - 1] == b[best.b_start - 1] {
        best.a_start -= 1;
        best.b_start -= 1;
        best.size += 1;
    }
    while best.a_start + best.size < a_hi
        && best.b_start + best.size < b_hi
        && a[best.a_start + best.size] == b[best.b_start + best.size]
    {
        best.size += 1;
    }

    best
}

/// A kept URL with its precomputed character length.
#[derive(Debug)]
struct KeptUrl<I> {
    url: String,
    chars: usize,
    id: I,
}

/// Checker for near-identical normalized URLs.
#[derive(Debug)]
pub struct SimilarityChecker<I> {
    /// Kept URLs in insertion order.
    kept: Vec<KeptUrl<I>>,
    threshold: f64,
    min_length_ratio: f64,
    max_length_ratio: f64,
}

impl<I> SimilarityChecker<I> {
    /// Creates an empty checker with the config's threshold and ratio bounds.
    #[must_use]
    pub const fn new(config: &DeduplicationConfig) -> Self {
        Self {
            kept: Vec::new(),
            threshold: config.similarity_threshold,
            min_length_ratio: config.min_length_ratio,
            max_length_ratio: config.max_length_ratio,
        }
    }

    /// Returns the first kept record whose URL reaches the threshold, with its score.
    ///
    /// Pairs whose length ratio `len(candidate) / len(kept)` falls outside the
    /// configured bounds are skipped without scoring. A zero-length kept URL
    /// is always skipped.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn check(&self, candidate: &str) -> Option<(&I, f64)> {
        let candidate_chars = candidate.chars().count();

        self.kept.iter().find_map(|kept| {
            if kept.chars == 0 {
                return None;
            }
            let length_ratio = candidate_chars as f64 / kept.chars as f64;
            if length_ratio < self.min_length_ratio || length_ratio > self.max_length_ratio {
                return None;
            }

            let score = similarity_ratio(candidate, &kept.url);
            (score >= self.threshold).then_some((&kept.id, score))
        })
    }

    /// Appends a kept URL to the comparison list.
    pub fn record(&mut self, url: &str, id: I) {
        self.kept.push(KeptUrl {
            url: url.to_string(),
            chars: url.chars().count(),
            id,
        });
    }

    /// Number of kept URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    /// Returns true if no URL has been kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}
