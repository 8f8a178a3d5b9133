//! Locating item text among rendered text fragments.
//!
//! The locator is a heuristic. It finds the first run of consecutive
//! fragments whose joined text contains the first few words of the
//! target (the *anchor*), and otherwise falls back to every fragment that
//! shares any word with the target. Repeated boilerplate can produce
//! false positives and reflowed or ligature-broken text can produce no
//! match at all; an empty result simply means nothing is highlighted.

use crate::model::TextFragment;
use serde::Serialize;

/// Default number of leading words used as the anchor.
pub const DEFAULT_ANCHOR_WORDS: usize = 5;

/// Default maximum number of fragments joined per window.
pub const DEFAULT_MAX_WINDOW: usize = 50;

/// Options for the text locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    /// Leading words of the target that form the anchor
    pub anchor_words: usize,

    /// Maximum fragments in one window
    pub max_window: usize,
}

impl LocateOptions {
    /// Create locate options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the anchor length in words (at least 1).
    pub fn with_anchor_words(mut self, words: usize) -> Self {
        self.anchor_words = words.max(1);
        self
    }

    /// Set the maximum window length in fragments (at least 1).
    pub fn with_max_window(mut self, fragments: usize) -> Self {
        self.max_window = fragments.max(1);
        self
    }
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            anchor_words: DEFAULT_ANCHOR_WORDS,
            max_window: DEFAULT_MAX_WINDOW,
        }
    }
}

/// Which stage of the locator produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// A contiguous window contained the anchor
    Anchor,
    /// Individual fragments shared a word with the target
    Fallback,
}

/// Fragment indices selected by the locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanMatch {
    /// Matched fragment indices, ascending
    pub indices: Vec<usize>,
    /// Stage that produced the match
    pub kind: MatchKind,
}

/// Find the fragments to highlight for `target`.
///
/// Returns an empty vector when nothing matches.
pub fn locate_span(target: &str, fragments: &[TextFragment]) -> Vec<usize> {
    locate_span_with_options(target, fragments, &LocateOptions::default())
}

/// [`locate_span`] with explicit options.
pub fn locate_span_with_options(
    target: &str,
    fragments: &[TextFragment],
    options: &LocateOptions,
) -> Vec<usize> {
    locate_match(target, fragments, options)
        .map(|m| m.indices)
        .unwrap_or_default()
}

/// Find the fragments to highlight and report which stage matched.
pub fn locate_match(
    target: &str,
    fragments: &[TextFragment],
    options: &LocateOptions,
) -> Option<SpanMatch> {
    let normalized = target.to_lowercase();
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() || fragments.is_empty() {
        return None;
    }

    let anchor = words[..words.len().min(options.anchor_words.max(1))].join(" ");
    let lowered: Vec<String> = fragments.iter().map(|f| f.text.to_lowercase()).collect();

    if let Some(indices) = find_anchor_window(&anchor, &lowered, options.max_window.max(1)) {
        return Some(SpanMatch {
            indices,
            kind: MatchKind::Anchor,
        });
    }

    let indices: Vec<usize> = lowered
        .iter()
        .enumerate()
        .filter(|(_, text)| words.iter().any(|w| text.contains(w)))
        .map(|(i, _)| i)
        .collect();

    (!indices.is_empty()).then_some(SpanMatch {
        indices,
        kind: MatchKind::Fallback,
    })
}

fn find_anchor_window(anchor: &str, lowered: &[String], max_window: usize) -> Option<Vec<usize>> {
    let mut joined = String::new();
    for start in 0..lowered.len() {
        joined.clear();
        let end = (start + max_window).min(lowered.len());
        for (j, text) in lowered.iter().enumerate().take(end).skip(start) {
            joined.push_str(text);
            joined.push(' ');
            // the anchor never has edge whitespace, so an untrimmed search is equivalent
            if joined.contains(anchor) {
                return Some((start..=j).collect());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frags(texts: &[&str]) -> Vec<TextFragment> {
        texts.iter().map(|t| TextFragment::text_only(*t)).collect()
    }

    #[test]
    fn test_exact_sequence_matches_contiguously() {
        let f = frags(&["The Buyer shall", "pay the Seller", "within 30 days"]);
        let hits = locate_span("The buyer shall pay the seller within 30 days.", &f);
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_window_grows_from_earliest_start() {
        // the first start index whose window reaches the anchor wins, leading fragment included
        let f = frags(&["Header", "The Buyer shall", "pay the Seller", "Footer"]);
        let hits = locate_span("The buyer shall pay the seller", &f);
        assert_eq!(hits, vec![0, 1, 2]);
    }

    #[test]
    fn test_window_starts_at_first_matching_index() {
        let f = frags(&["net", "terms", "apply", "net terms apply"]);
        assert_eq!(locate_span("Net terms apply", &f), vec![0, 1, 2]);
    }

    #[test]
    fn test_anchor_uses_first_five_words_only() {
        let f = frags(&["one two three four five", "something else entirely"]);
        let m = locate_match(
            "One two three four five six seven",
            &f,
            &LocateOptions::default(),
        )
        .unwrap();
        assert_eq!(m.kind, MatchKind::Anchor);
        assert_eq!(m.indices, vec![0]);
    }

    #[test]
    fn test_fallback_on_shared_word() {
        let f = frags(&["Payment schedule", "Net terms", "Late payment fee"]);
        let m = locate_match("payment due upon receipt", &f, &LocateOptions::default()).unwrap();
        assert_eq!(m.kind, MatchKind::Fallback);
        assert_eq!(m.indices, vec![0, 2]);
    }

    #[test]
    fn test_no_shared_vocabulary_is_empty() {
        let f = frags(&["alpha", "beta", "gamma"]);
        assert!(locate_span("omega psi", &f).is_empty());
    }

    #[test]
    fn test_empty_target_or_fragments() {
        let f = frags(&["anything"]);
        assert!(locate_span("   ", &f).is_empty());
        assert!(locate_span("anything", &[]).is_empty());
    }

    #[test]
    fn test_window_limit() {
        let f = frags(&["a", "b", "c", "d"]);
        let narrow = LocateOptions::new().with_max_window(2).with_anchor_words(4);
        let m = locate_match("a b c d", &f, &narrow).unwrap();
        assert_eq!(m.kind, MatchKind::Fallback);

        let wide = LocateOptions::new().with_anchor_words(4);
        let m = locate_match("a b c d", &f, &wide).unwrap();
        assert_eq!(m.kind, MatchKind::Anchor);
        assert_eq!(m.indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_anchor_spans_fragment_boundary_with_space() {
        // fragments are joined with a space, so a word split mid-way does not rejoin
        let f = frags(&["Pay", "ment due"]);
        let m = locate_match("Payment due", &f, &LocateOptions::default()).unwrap();
        assert_eq!(m.kind, MatchKind::Fallback);
        assert_eq!(m.indices, vec![1]);
    }
}
