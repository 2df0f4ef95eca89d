use regex::RegexBuilder;

use super::fuzzy::FuzzyScorer;
use super::types::{ChatMessage, ScrollAnchor};

/// Maximum fuzzy results kept when searching a finite scrollback log.
pub const FUZZY_SCROLLBACK_LIMIT: usize = 5000;

/// Compiled-size cap for user-supplied patterns; larger patterns are treated as invalid.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Handler for a `keyword:remainder` query.
type PrefixFilter = for<'m> fn(&str, &'m [ChatMessage]) -> Vec<&'m ChatMessage>;

/// Query keywords, matched case-insensitively against the text before the
/// first colon. Queries with no known keyword fall through to fuzzy ranking.
const PREFIX_FILTERS: &[(&str, PrefixFilter)] = &[
    ("regex", filter_regex),
    ("in", filter_channels),
    ("channel", filter_channels),
    ("from", filter_users),
    ("user", filter_users),
    ("username", filter_users),
];

/// Search chat messages.
///
/// Query forms:
///
/// - `regex:<pattern>` - case-insensitive regex against the message text
/// - `in:<chan>[,<chan>...]` - messages from the listed channels
/// - `from:<user>[,<user>...]` - messages from the listed display names
/// - anything else - fuzzy match, results in chronological order
/// - empty - every message
///
/// With [`ScrollAnchor::Bottom`] the final result is reversed so it can be
/// rendered newest-first.
///
/// Never fails: an invalid regex simply matches nothing.
///
/// Patterns use the [`regex`] crate's syntax, which has no lookaround
/// (`(?=...)`, `(?<!...)`) or backreferences (`\1`). Such patterns fail to
/// compile and therefore match nothing.
///
/// ```
/// use vodchat::search::{search, ChatMessage, ScrollAnchor};
///
/// let log: Vec<ChatMessage> = serde_json::from_str(r#"[
///     {"text": "!uptime", "displayName": "a", "timestamp": "2024-01-01T00:00:00Z", "id": "1"},
///     {"text": "hi chat", "displayName": "b", "timestamp": "2024-01-01T00:00:01Z", "id": "2"}
/// ]"#).unwrap();
///
/// let hits = search("regex:^!", &log, ScrollAnchor::Live);
/// assert_eq!(hits.len(), 1);
/// assert!(search("regex:(", &log, ScrollAnchor::Live).is_empty());
/// ```
pub fn search<'m>(
    query: &str,
    messages: &'m [ChatMessage],
    anchor: ScrollAnchor,
) -> Vec<&'m ChatMessage> {
    let mut results = if query.trim().is_empty() {
        messages.iter().collect()
    } else if let Some((filter, remainder)) = prefix_filter(query) {
        filter(remainder, messages)
    } else {
        rank_fuzzy(query, messages, anchor)
    };

    if anchor == ScrollAnchor::Bottom {
        results.reverse();
    }
    results
}

fn prefix_filter(query: &str) -> Option<(PrefixFilter, &str)> {
    let (keyword, remainder) = query.split_once(':')?;
    PREFIX_FILTERS
        .iter()
        .find(|(name, _)| keyword.eq_ignore_ascii_case(name))
        .map(|&(_, filter)| (filter, remainder))
}

fn filter_regex<'m>(pattern: &str, messages: &'m [ChatMessage]) -> Vec<&'m ChatMessage> {
    let regex = match RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
    {
        Ok(regex) => regex,
        Err(e) => {
            tracing::debug!(pattern = %pattern, error = %e, "Invalid search regex, returning no results");
            return Vec::new();
        }
    };

    messages.iter().filter(|m| regex.is_match(&m.text)).collect()
}

fn filter_channels<'m>(list: &str, messages: &'m [ChatMessage]) -> Vec<&'m ChatMessage> {
    let wanted = split_names(list);
    messages
        .iter()
        .filter(|m| {
            m.channel
                .as_deref()
                .is_some_and(|channel| wanted.contains(&channel.to_lowercase()))
        })
        .collect()
}

fn filter_users<'m>(list: &str, messages: &'m [ChatMessage]) -> Vec<&'m ChatMessage> {
    let wanted = split_names(list);
    messages
        .iter()
        .filter(|m| wanted.contains(&m.display_name.to_lowercase()))
        .collect()
}

/// Comma-separated, trimmed, lowercased; empty entries dropped.
fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn rank_fuzzy<'m>(
    query: &str,
    messages: &'m [ChatMessage],
    anchor: ScrollAnchor,
) -> Vec<&'m ChatMessage> {
    let Some(mut scorer) = FuzzyScorer::new(query) else {
        return Vec::new();
    };

    let mut ranked: Vec<(f64, &ChatMessage)> = messages
        .iter()
        .filter_map(|m| {
            let score = match anchor {
                ScrollAnchor::Live => scorer.best_similarity(&[
                    m.channel.as_deref().unwrap_or_default(),
                    m.display_name.as_str(),
                    m.text.as_str(),
                ]),
                ScrollAnchor::Top | ScrollAnchor::Bottom => scorer.similarity(&m.text),
            };
            FuzzyScorer::passes(score).map(|s| (s, m))
        })
        .collect();

    if anchor != ScrollAnchor::Live && ranked.len() > FUZZY_SCROLLBACK_LIMIT {
        // Stable: equal scores keep log order
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranked.truncate(FUZZY_SCROLLBACK_LIMIT);
    }

    let mut results: Vec<&ChatMessage> = ranked.into_iter().map(|(_, m)| m).collect();
    results.sort_by_key(|m| chronological_key(m));
    results
}

/// Sort key placing unparseable timestamps after every parseable one.
fn chronological_key(message: &ChatMessage) -> (bool, i64) {
    match message.timestamp_millis() {
        Some(millis) => (false, millis),
        None => (true, 0),
    }
}
