use serde::{Deserialize, Serialize};

use super::client::{ApiClient, FetchError};

/// A chat badge set (e.g. `subscriber`) with one entry per tier/version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub set_id: String,
    #[serde(default)]
    pub versions: Vec<BadgeVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeVersion {
    pub id: String,
    #[serde(default)]
    pub image_url_1x: String,
    #[serde(default)]
    pub image_url_2x: String,
    #[serde(default)]
    pub image_url_4x: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub click_action: Option<String>,
    #[serde(default)]
    pub click_url: Option<String>,
}

impl ApiClient {
    /// Channel-specific badges (subscriber tiers, bits) for a Twitch user id.
    pub async fn channel_badges(&self, channel_id: &str) -> Result<Vec<Badge>, FetchError> {
        let mut url = Self::endpoint_url(&self.endpoints.ivr, &["twitch", "badges", "channel"])?;
        url.query_pairs_mut().append_pair("id", channel_id);
        let badges: Option<Vec<Badge>> = self.get_json(url).await?;
        Ok(badges.unwrap_or_default())
    }

    pub async fn global_badges(&self) -> Result<Vec<Badge>, FetchError> {
        let url = Self::endpoint_url(&self.endpoints.ivr, &["twitch", "badges", "global"])?;
        let badges: Option<Vec<Badge>> = self.get_json(url).await?;
        Ok(badges.unwrap_or_default())
    }
}
