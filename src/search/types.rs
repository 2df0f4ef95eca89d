use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

// ============================================================================
// Chat Messages
// ============================================================================

/// A single chat line as served by the log archive or the live feed.
///
/// Owned by whoever loaded the log; search only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub text: String,
    pub display_name: String,
    /// Channel the message was sent in; absent when searching a single-channel log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Date-time string, normally RFC 3339.
    pub timestamp: String,
    pub id: String,
    /// Raw IRC tags (badges, color, emotes, ...).
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Naive formats accepted when the timestamp is not RFC 3339; interpreted as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl ChatMessage {
    /// Milliseconds since the Unix epoch, or `None` when the timestamp is unparseable.
    pub fn timestamp_millis(&self) -> Option<i64> {
        let raw = self.timestamp.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.timestamp_millis());
        }
        NAIVE_TIMESTAMP_FORMATS.iter().find_map(|format| {
            NaiveDateTime::parse_from_str(raw, format)
                .ok()
                .map(|naive| naive.and_utc().timestamp_millis())
        })
    }
}

// ============================================================================
// Scroll Anchor
// ============================================================================

/// Where the chat view that issued a search is anchored.
///
/// Mirrors the tri-state the web UI passes around: `None` for the live
/// firehose, `Some(true)` for a scrollback log read top-down, `Some(false)`
/// for a scrollback log shown newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAnchor {
    /// Unbounded live stream; fuzzy search ranks every field.
    #[default]
    Live,
    /// Finite log in chronological order.
    Top,
    /// Finite log displayed newest-first; results come back reversed.
    Bottom,
}

impl From<Option<bool>> for ScrollAnchor {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => ScrollAnchor::Live,
            Some(true) => ScrollAnchor::Top,
            Some(false) => ScrollAnchor::Bottom,
        }
    }
}

impl FromStr for ScrollAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "live" => Ok(ScrollAnchor::Live),
            "top" => Ok(ScrollAnchor::Top),
            "bottom" => Ok(ScrollAnchor::Bottom),
            other => Err(format!(
                "unknown scroll anchor '{other}' (expected live, top or bottom)"
            )),
        }
    }
}
