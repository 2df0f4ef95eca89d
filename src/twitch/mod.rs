//! Clients for the remote services behind the VOD and chat-replay views.
//!
//! A single [`ApiClient`] covers all of them:
//!
//! - the VOD archive's user directory (`users`, `user`)
//! - the chat-log archive's channel list (`log_channels`)
//! - BetterTTV, FrankerFaceZ and 7TV emotes (`channel_emotes`, `global_emotes`)
//! - Twitch chat badges via IVR (`channel_badges`, `global_badges`)
//!
//! Every call is one GET with a timeout and no retry; failures are reported
//! as [`FetchError`].

mod badges;
mod client;
mod emotes;
mod logs;
mod vods;

pub use badges::{Badge, BadgeVersion};
pub use client::{ApiClient, FetchError, REQUEST_TIMEOUT};
pub use emotes::{Emote, EmoteProvider};
pub use logs::LogChannel;
pub use vods::{ContractType, Social, User};
