use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Minimum normalized similarity for a fuzzy match to count.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Fuzzy similarity scorer for one query, reused across many haystacks.
///
/// Raw nucleo scores grow with needle length, so they are normalized against
/// the score the query earns when matched against itself. A haystack that
/// contains the query at a word boundary scores 1.0; scattered matches score
/// less; haystacks missing any query character do not match at all.
pub(crate) struct FuzzyScorer {
    atom: Atom,
    matcher: Matcher,
    buf: Vec<char>,
    perfect: f64,
}

impl FuzzyScorer {
    /// Returns `None` for a blank query, which matches nothing.
    pub(crate) fn new(query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let atom = Atom::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
            false,
        );
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();
        let perfect = atom.score(Utf32Str::new(query, &mut buf), &mut matcher)?;
        if perfect == 0 {
            return None;
        }

        Some(Self {
            atom,
            matcher,
            buf,
            perfect: f64::from(perfect),
        })
    }

    /// Similarity in `0.0..=1.0`, or `None` when the haystack does not match.
    pub(crate) fn similarity(&mut self, haystack: &str) -> Option<f64> {
        if haystack.is_empty() {
            return None;
        }
        let score = self
            .atom
            .score(Utf32Str::new(haystack, &mut self.buf), &mut self.matcher)?;
        Some((f64::from(score) / self.perfect).min(1.0))
    }

    /// Best similarity across several fields of the same record.
    pub(crate) fn best_similarity(&mut self, fields: &[&str]) -> Option<f64> {
        fields
            .iter()
            .filter_map(|field| self.similarity(field))
            .reduce(f64::max)
    }

    /// Similarity if it clears [`SIMILARITY_THRESHOLD`].
    pub(crate) fn passes(score: Option<f64>) -> Option<f64> {
        score.filter(|&s| s >= SIMILARITY_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_has_no_scorer() {
        assert!(FuzzyScorer::new("").is_none());
        assert!(FuzzyScorer::new("   ").is_none());
    }

    #[test]
    fn test_self_match_is_perfect() {
        let mut scorer = FuzzyScorer::new("pogchamp").unwrap();
        assert_eq!(scorer.similarity("pogchamp"), Some(1.0));
    }

    #[test]
    fn test_case_insensitive() {
        let mut scorer = FuzzyScorer::new("Hello").unwrap();
        let score = scorer.similarity("HELLO chat").unwrap();
        assert!(score >= SIMILARITY_THRESHOLD, "score was {score}");
    }

    #[test]
    fn test_word_match_clears_threshold() {
        let mut scorer = FuzzyScorer::new("hello").unwrap();
        let score = scorer.similarity("well hello there").unwrap();
        assert!(score >= SIMILARITY_THRESHOLD, "score was {score}");
    }

    #[test]
    fn test_missing_characters_do_not_match() {
        let mut scorer = FuzzyScorer::new("zzz").unwrap();
        assert_eq!(scorer.similarity("hello world"), None);
        assert_eq!(scorer.similarity(""), None);
    }

    #[test]
    fn test_best_similarity_picks_matching_field() {
        let mut scorer = FuzzyScorer::new("forsen").unwrap();
        let best = scorer.best_similarity(&["", "nobody", "forsen"]);
        assert_eq!(best, Some(1.0));
        assert_eq!(scorer.best_similarity(&["abc", "xyz"]), None);
    }

    #[test]
    fn test_passes_threshold() {
        assert_eq!(FuzzyScorer::passes(Some(0.5)), Some(0.5));
        assert_eq!(FuzzyScorer::passes(Some(0.49)), None);
        assert_eq!(FuzzyScorer::passes(None), None);
    }
}
