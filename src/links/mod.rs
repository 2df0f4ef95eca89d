//! Link detection for chat messages.
//!
//! Chat text is full of things that look almost like links: version numbers,
//! abbreviations, emote names with dots, Markdown wrapping. The recognizer here
//! is deliberately permissive about *form* (no scheme required, IDN hosts,
//! trailing punctuation) and strict about *substance* (the host must end in a
//! known TLD or be an IPv4 literal).
//!
//! - `tld` - the immutable TLD lookup set
//! - `parser` - the character-scanning recognizer
//!
//! # Example
//!
//! ```
//! use vodchat::links::{LinkRecognizer, TldSet};
//!
//! let recognizer = LinkRecognizer::new(TldSet::builtin());
//! let links = recognizer.find_links("vod is up at twitch.tv/videos/1 (finally!)");
//! assert_eq!(links.len(), 1);
//! assert_eq!(links[0].host, "twitch.tv");
//! ```

mod parser;
mod tld;

pub use parser::{LinkRecognizer, ParsedLink};
pub use tld::{TldError, TldSet};
