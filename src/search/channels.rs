use serde::Serialize;

use super::fuzzy::FuzzyScorer;

/// Maximum number of channel suggestions returned per query.
pub const CHANNEL_MATCH_LIMIT: usize = 5;

/// A channel name suggested for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMatch<'a> {
    pub name: &'a str,
    /// Normalized similarity, `0.5..=1.0`.
    pub score: f64,
}

/// Channel names known to the chat-log archive, searchable by fuzzy prefix.
#[derive(Debug, Clone, Default)]
pub struct ChannelIndex {
    names: Vec<String>,
}

impl ChannelIndex {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Up to [`CHANNEL_MATCH_LIMIT`] channels resembling `query`, best first.
    /// Equal scores are ordered by name.
    pub fn search(&self, query: &str) -> Vec<ChannelMatch<'_>> {
        let Some(mut scorer) = FuzzyScorer::new(query) else {
            return Vec::new();
        };

        let mut matches: Vec<ChannelMatch<'_>> = self
            .names
            .iter()
            .filter_map(|name| {
                FuzzyScorer::passes(scorer.similarity(name)).map(|score| ChannelMatch {
                    name: name.as_str(),
                    score,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.name.cmp(b.name)));
        matches.truncate(CHANNEL_MATCH_LIMIT);

        tracing::debug!(query = %query, matches = matches.len(), "Channel search");
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index(names: &[&str]) -> ChannelIndex {
        ChannelIndex::new(names.iter().map(|n| n.to_string()))
    }

    #[test]
    fn test_best_match_first() {
        let index = index(&["xqc", "forsenlol", "pokimane", "forsen", "lirik"]);
        let results = index.search("forsen");
        let names: Vec<&str> = results.iter().map(|m| m.name).collect();

        assert_eq!(names.first(), Some(&"forsen"));
        assert!(names.contains(&"forsenlol"));
        assert!(!names.contains(&"xqc"));
        assert!(!names.contains(&"pokimane"));
    }

    #[test]
    fn test_result_limit() {
        let index = index(&[
            "chan8", "chan7", "chan6", "chan5", "chan4", "chan3", "chan2", "chan1",
        ]);
        let results = index.search("chan");
        let names: Vec<&str> = results.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["chan1", "chan2", "chan3", "chan4", "chan5"]);
    }

    #[test]
    fn test_scores_within_bounds() {
        let index = index(&["forsen", "nymn", "zoil"]);
        for m in index.search("forsen") {
            assert!(m.score >= 0.5 && m.score <= 1.0);
        }
    }

    #[test]
    fn test_empty_query_and_index() {
        let populated = index(&["forsen"]);
        assert!(populated.search("").is_empty());
        assert_eq!(populated.len(), 1);

        let empty = ChannelIndex::default();
        assert!(empty.is_empty());
        assert!(empty.search("forsen").is_empty());
    }
}
