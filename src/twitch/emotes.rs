//! Third-party emote providers: BetterTTV, FrankerFaceZ and 7TV.
//!
//! Each provider has its own response shape; all of them are flattened into
//! a plain list of [`Emote`]s. Missing or `null` lists decode as empty.
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::client::{ApiClient, FetchError};

/// A third-party emote. BetterTTV names it `code`, the others `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emote {
    /// FrankerFaceZ uses numeric ids; they are kept as strings.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Emote {
    /// The text that triggers the emote in chat.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or(&self.id)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmoteProvider {
    BetterTtv,
    FrankerFaceZ,
    SevenTv,
}

impl EmoteProvider {
    pub const ALL: [EmoteProvider; 3] = [
        EmoteProvider::BetterTtv,
        EmoteProvider::FrankerFaceZ,
        EmoteProvider::SevenTv,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EmoteProvider::BetterTtv => "BetterTTV",
            EmoteProvider::FrankerFaceZ => "FrankerFaceZ",
            EmoteProvider::SevenTv => "7TV",
        }
    }
}

impl fmt::Display for EmoteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EmoteProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bttv" | "betterttv" => Ok(EmoteProvider::BetterTtv),
            "ffz" | "frankerfacez" => Ok(EmoteProvider::FrankerFaceZ),
            "7tv" | "seventv" => Ok(EmoteProvider::SevenTv),
            other => Err(format!(
                "unknown emote provider '{other}' (expected bttv, ffz or 7tv)"
            )),
        }
    }
}

// ============================================================================
// Provider response shapes
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BttvChannel {
    #[serde(default)]
    channel_emotes: Option<Vec<Emote>>,
    #[serde(default)]
    shared_emotes: Option<Vec<Emote>>,
}

#[derive(Deserialize)]
struct FfzSet {
    #[serde(default)]
    emoticons: Option<Vec<Emote>>,
}

#[derive(Deserialize)]
struct FfzRoomInfo {
    #[serde(default)]
    set: Option<u64>,
}

#[derive(Deserialize)]
struct FfzRoom {
    #[serde(default)]
    room: Option<FfzRoomInfo>,
    #[serde(default)]
    sets: BTreeMap<String, FfzSet>,
}

#[derive(Deserialize)]
struct FfzGlobal {
    #[serde(default)]
    default_sets: Vec<u64>,
    #[serde(default)]
    sets: BTreeMap<String, FfzSet>,
}

#[derive(Deserialize)]
struct SevenTvSet {
    #[serde(default)]
    emotes: Option<Vec<Emote>>,
}

#[derive(Deserialize)]
struct SevenTvUser {
    #[serde(default)]
    emote_set: Option<SevenTvSet>,
}

impl FfzRoom {
    /// Emoticons of the room's own set, or of the first set listed.
    fn into_emotes(self) -> Vec<Emote> {
        let FfzRoom { room, mut sets } = self;
        let own = room
            .and_then(|room| room.set)
            .and_then(|id| sets.remove(&id.to_string()));
        let set = match own {
            Some(set) => Some(set),
            None => sets.into_values().next(),
        };
        set.and_then(|s| s.emoticons).unwrap_or_default()
    }
}

impl FfzGlobal {
    fn into_emotes(self) -> Vec<Emote> {
        let FfzGlobal {
            default_sets,
            mut sets,
        } = self;
        default_sets
            .iter()
            .filter_map(|id| sets.remove(&id.to_string()))
            .flat_map(|set| set.emoticons.unwrap_or_default())
            .collect()
    }
}

// ============================================================================
// Client calls
// ============================================================================

impl ApiClient {
    /// Emotes enabled for one channel, addressed by Twitch user id.
    pub async fn channel_emotes(
        &self,
        provider: EmoteProvider,
        channel_id: &str,
    ) -> Result<Vec<Emote>, FetchError> {
        let emotes = match provider {
            EmoteProvider::BetterTtv => {
                let url = Self::endpoint_url(
                    &self.endpoints.betterttv,
                    &["cached", "users", "twitch", channel_id],
                )?;
                let data: BttvChannel = self.get_json(url).await?;
                let mut emotes = data.channel_emotes.unwrap_or_default();
                emotes.extend(data.shared_emotes.unwrap_or_default());
                emotes
            }
            EmoteProvider::FrankerFaceZ => {
                let url =
                    Self::endpoint_url(&self.endpoints.frankerfacez, &["room", "id", channel_id])?;
                let data: FfzRoom = self.get_json(url).await?;
                data.into_emotes()
            }
            EmoteProvider::SevenTv => {
                let url = Self::endpoint_url(
                    &self.endpoints.seventv,
                    &["users", "twitch", channel_id],
                )?;
                let data: SevenTvUser = self.get_json(url).await?;
                data.emote_set.and_then(|s| s.emotes).unwrap_or_default()
            }
        };

        tracing::debug!(provider = %provider, channel_id, count = emotes.len(), "Fetched channel emotes");
        Ok(emotes)
    }

    /// Emotes available in every channel.
    pub async fn global_emotes(&self, provider: EmoteProvider) -> Result<Vec<Emote>, FetchError> {
        let emotes = match provider {
            EmoteProvider::BetterTtv => {
                let url =
                    Self::endpoint_url(&self.endpoints.betterttv, &["cached", "emotes", "global"])?;
                let data: Option<Vec<Emote>> = self.get_json(url).await?;
                data.unwrap_or_default()
            }
            EmoteProvider::FrankerFaceZ => {
                let url = Self::endpoint_url(&self.endpoints.frankerfacez, &["set", "global"])?;
                let data: FfzGlobal = self.get_json(url).await?;
                data.into_emotes()
            }
            EmoteProvider::SevenTv => {
                let url = Self::endpoint_url(&self.endpoints.seventv, &["emote-sets", "global"])?;
                let data: SevenTvSet = self.get_json(url).await?;
                data.emotes.unwrap_or_default()
            }
        };

        tracing::debug!(provider = %provider, count = emotes.len(), "Fetched global emotes");
        Ok(emotes)
    }
}
