use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Top-level domains compiled into the binary, one lowercase label per line.
const BUILTIN_TLDS: &str = include_str!("tlds.txt");

/// Errors that can occur while loading a custom TLD list.
#[derive(Debug, Error)]
pub enum TldError {
    #[error("Failed to read TLD file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TLD list (expected a JSON array of strings): {0}")]
    Parse(#[from] serde_json::Error),

    #[error("TLD list is empty")]
    Empty,
}

/// Immutable set of known top-level domains.
///
/// Built once at start-up and handed to [`LinkRecognizer`](super::LinkRecognizer)
/// by value; lookups never mutate it, so a single set can be shared across
/// threads behind a plain reference.
#[derive(Debug, Clone)]
pub struct TldSet {
    labels: HashSet<String>,
}

impl TldSet {
    /// The list shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_labels(BUILTIN_TLDS.lines())
    }

    /// Parse a JSON array of TLD strings (the `tlds.json` format).
    pub fn from_json(json: &str) -> Result<Self, TldError> {
        let labels: Vec<String> = serde_json::from_str(json)?;
        let set = Self::from_labels(labels.iter().map(String::as_str));
        if set.is_empty() {
            return Err(TldError::Empty);
        }
        Ok(set)
    }

    /// Load a JSON TLD list from disk.
    pub fn load(path: &Path) -> Result<Self, TldError> {
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), count = set.len(), "Loaded TLD list");
        Ok(set)
    }

    fn from_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Self {
        let labels = labels
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { labels }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, label: &str) -> bool {
        if label.is_empty() {
            return false;
        }
        // Fast path: most labels in chat are already lowercase ASCII
        if label.is_ascii() && !label.bytes().any(|b| b.is_ascii_uppercase()) {
            return self.labels.contains(label);
        }
        self.labels.contains(&label.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
