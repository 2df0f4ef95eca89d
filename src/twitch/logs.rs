use serde::{Deserialize, Serialize};

use super::client::{ApiClient, FetchError};

/// A channel whose chat is archived by the log service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogChannel {
    pub name: String,
    #[serde(rename = "userID")]
    pub user_id: String,
}

#[derive(Deserialize)]
struct ChannelList {
    #[serde(default)]
    channels: Vec<LogChannel>,
}

impl ApiClient {
    /// Lists every channel the chat-log archive knows about.
    pub async fn log_channels(&self) -> Result<Vec<LogChannel>, FetchError> {
        let url = Self::endpoint_url(&self.endpoints.logs, &["channels"])?;
        let list: ChannelList = self.get_json(url).await?;
        tracing::debug!(count = list.channels.len(), "Fetched log channels");
        Ok(list.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitch::client::{test_endpoints, REQUEST_TIMEOUT};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_log_channels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"channels":[{"name":"forsen","userID":"22484632"},{"name":"xqc","userID":"71092938"}]}"#,
            ))
            .mount(&server)
            .await;

        let client = ApiClient::new(&test_endpoints(&server.uri()), REQUEST_TIMEOUT).unwrap();
        let channels = client.log_channels().await.unwrap();
        assert_eq!(
            channels,
            vec![
                LogChannel {
                    name: "forsen".to_string(),
                    user_id: "22484632".to_string()
                },
                LogChannel {
                    name: "xqc".to_string(),
                    user_id: "71092938".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_log_channels_missing_list_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&test_endpoints(&server.uri()), REQUEST_TIMEOUT).unwrap();
        assert!(client.log_channels().await.unwrap().is_empty());
    }
}
