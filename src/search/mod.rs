//! Chat search.
//!
//! - `messages` - query dispatch over a chat log (regex, channel and user
//!   filters, fuzzy ranking)
//! - `channels` - fuzzy lookup of archived channel names
//! - `types` - the chat message model and scroll anchor
//!
//! Everything here is synchronous and allocation-light: results borrow from
//! the caller's data, nothing is cached between calls.

mod channels;
mod fuzzy;
mod messages;
mod types;

pub use channels::{ChannelIndex, ChannelMatch, CHANNEL_MATCH_LIMIT};
pub use fuzzy::SIMILARITY_THRESHOLD;
pub use messages::{search, FUZZY_SCROLLBACK_LIMIT};
pub use types::{ChatMessage, ScrollAnchor};
