//! VOD archive user directory.
use serde::{Deserialize, Serialize};

use super::client::{ApiClient, FetchError};

/// Twitch monetization status of a broadcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractType {
    Affiliate,
    Partner,
}

/// A link from a broadcaster's profile panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub url: String,
    pub name: String,
    pub title: String,
}

/// A broadcaster with archived VODs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Archive-internal id.
    pub id: i64,
    pub twitch_id: String,
    pub login: String,
    pub display_name: String,
    pub avatar_url: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    #[serde(default)]
    pub is_staff: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub offline_image_url: Option<String>,
    #[serde(default)]
    pub unlisted: Option<bool>,
    #[serde(default)]
    pub socials: Vec<Social>,
}

impl User {
    pub fn is_partner(&self) -> bool {
        self.contract_type == Some(ContractType::Partner)
    }
}

impl ApiClient {
    /// Lists every broadcaster in the VOD archive.
    pub async fn users(&self) -> Result<Vec<User>, FetchError> {
        let url = Self::endpoint_url(&self.endpoints.vods, &["users"])?;
        self.get_json(url).await
    }

    /// Looks up one broadcaster by login (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] when the archive answers 404, and
    /// [`FetchError::HttpStatus`] for any other non-2xx status.
    pub async fn user(&self, login: &str) -> Result<User, FetchError> {
        let login = login.trim().to_lowercase();
        let mut url = Self::endpoint_url(&self.endpoints.vods, &["user"])?;
        url.query_pairs_mut().append_pair("login", &login);

        match self.get_json(url).await {
            Err(FetchError::HttpStatus { status: 404, .. }) => {
                tracing::debug!(login = %login, "User not found in archive");
                Err(FetchError::NotFound(login))
            }
            other => other,
        }
    }
}
