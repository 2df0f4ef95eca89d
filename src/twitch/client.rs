use crate::config::Endpoints;
use crate::util::{validate_endpoint, UrlValidationError};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const USER_AGENT: &str = concat!("vodchat/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while talking to one of the remote APIs.
///
/// Every failure of a client call ends up here; callers decide whether to
/// show an error or fall back to an empty list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The whole exchange (connect, headers, body) exceeded the timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {status} from {url}")]
    HttpStatus { status: u16, url: String },
    /// The requested entity does not exist (HTTP 404 on a single-entity lookup)
    #[error("Not found: {0}")]
    NotFound(String),
    /// Body was not the JSON shape we expected
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// A configured base URL failed validation
    #[error("Invalid {name} endpoint: {source}")]
    InvalidEndpoint {
        name: &'static str,
        #[source]
        source: UrlValidationError,
    },
    /// A request URL could not be built from its base
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// HTTP status code, when the server answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            FetchError::NotFound(_) => Some(404),
            FetchError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Validated base URLs, one per remote service.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedEndpoints {
    pub(crate) vods: Url,
    pub(crate) logs: Url,
    pub(crate) betterttv: Url,
    pub(crate) frankerfacez: Url,
    pub(crate) seventv: Url,
    pub(crate) ivr: Url,
}

impl ResolvedEndpoints {
    fn resolve(endpoints: &Endpoints) -> Result<Self, FetchError> {
        fn one(name: &'static str, raw: &str) -> Result<Url, FetchError> {
            validate_endpoint(raw).map_err(|source| FetchError::InvalidEndpoint { name, source })
        }

        Ok(Self {
            vods: one("vods", &endpoints.vods)?,
            logs: one("logs", &endpoints.logs)?,
            betterttv: one("betterttv", &endpoints.betterttv)?,
            frankerfacez: one("frankerfacez", &endpoints.frankerfacez)?,
            seventv: one("seventv", &endpoints.seventv)?,
            ivr: one("ivr", &endpoints.ivr)?,
        })
    }
}

/// Client for the VOD archive, chat-log archive, emote providers and badge API.
///
/// Cheap to clone; clones share the underlying connection pool. Requests are
/// never retried: a failed call surfaces as a [`FetchError`] immediately.
///
/// The per-service calls live next to their response types (`vods`, `logs`,
/// `emotes`, `badges`).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    pub(crate) endpoints: ResolvedEndpoints,
    timeout: Duration,
}

impl ApiClient {
    /// Builds a client after validating every configured base URL.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidEndpoint`] if any base URL is malformed or insecure
    /// - [`FetchError::Network`] if the HTTP client cannot be constructed
    pub fn new(endpoints: &Endpoints, timeout: Duration) -> Result<Self, FetchError> {
        let endpoints = ResolvedEndpoints::resolve(endpoints)?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            endpoints,
            timeout,
        })
    }

    /// Appends path segments to a base URL; each segment is percent-encoded.
    pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(base.to_string()))?
            .extend(segments);
        Ok(url)
    }

    /// GETs `url` and decodes the JSON body.
    ///
    /// The timeout covers the whole exchange including reading the body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "GET");

        let bytes = tokio::time::timeout(self.timeout, self.fetch_bytes(&url))
            .await
            .map_err(|_| {
                tracing::warn!(url = %url, timeout = ?self.timeout, "Request timed out");
                FetchError::Timeout(self.timeout)
            })??;

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Unexpected response body");
            FetchError::Decode(e)
        })
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "API request failed");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        read_limited_bytes(response, MAX_RESPONSE_SIZE).await
    }
}

/// Reads a response body, giving up once it exceeds `limit` bytes.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

/// Endpoints that all point at one mock server.
#[cfg(test)]
pub(crate) fn test_endpoints(base: &str) -> Endpoints {
    Endpoints {
        vods: base.to_string(),
        logs: base.to_string(),
        betterttv: format!("{base}/3"),
        frankerfacez: format!("{base}/v1"),
        seventv: format!("{base}/v3"),
        ivr: format!("{base}/v2"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        ok: bool,
    }

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&test_endpoints(&server.uri()), REQUEST_TIMEOUT).unwrap()
    }

    #[test]
    fn test_default_endpoints_are_valid() {
        assert!(ApiClient::new(&Endpoints::default(), REQUEST_TIMEOUT).is_ok());
    }

    #[test]
    fn test_insecure_endpoint_rejected() {
        let endpoints = Endpoints {
            ivr: "http://api.ivr.fi/v2".to_string(),
            ..Endpoints::default()
        };
        let err = ApiClient::new(&endpoints, REQUEST_TIMEOUT).unwrap_err();
        assert!(matches!(err, FetchError::InvalidEndpoint { name: "ivr", .. }));
    }

    #[test]
    fn test_endpoint_url_encodes_segments() {
        let base = Url::parse("https://7tv.io/v3").unwrap();
        let url = ApiClient::endpoint_url(&base, &["users", "twitch", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://7tv.io/v3/users/twitch/a%20b%2Fc");
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let url = ApiClient::endpoint_url(&client.endpoints.logs, &["ping"]).unwrap();
        let ping: Ping = client.get_json(url).await.unwrap();
        assert_eq!(ping, Ping { ok: true });
    }

    #[tokio::test]
    async fn test_get_json_http_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1) // no retry
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let url = ApiClient::endpoint_url(&client.endpoints.logs, &["ping"]).unwrap();
        let err = client.get_json::<Ping>(url).await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert!(matches!(err, FetchError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_get_json_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let url = ApiClient::endpoint_url(&client.endpoints.logs, &["ping"]).unwrap();
        let err = client.get_json::<Ping>(url).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_get_json_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"ok":true}"#)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(
            &test_endpoints(&server.uri()),
            Duration::from_millis(100),
        )
        .unwrap();
        let url = ApiClient::endpoint_url(&client.endpoints.logs, &["ping"]).unwrap();
        let err = client.get_json::<Ping>(url).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let server = MockServer::start().await;
        let body = vec![b' '; MAX_RESPONSE_SIZE + 1];
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let url = ApiClient::endpoint_url(&client.endpoints.logs, &["ping"]).unwrap();
        let err = client.get_json::<Ping>(url).await.unwrap_err();
        assert!(matches!(err, FetchError::ResponseTooLarge));
    }
}
