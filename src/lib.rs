//! Toolkit for archived Twitch VODs and their chat logs.
//!
//! - [`links`]: recognizes URLs in chat text
//! - [`search`]: filters and ranks chat messages, finds channels by name
//! - [`twitch`]: clients for the VOD archive, log archive, emote and badge APIs
//! - [`config`]: optional TOML configuration
//! - [`util`]: terminal-output and formatting helpers

pub mod config;
pub mod links;
pub mod search;
pub mod twitch;
pub mod util;
