use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur when validating an API endpoint base URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP to a non-loopback host.
    #[error("Insecure endpoint: {0} (HTTPS required except for localhost)")]
    Insecure(String),
    /// The URL cannot have path segments appended (e.g. `mailto:`-style URLs).
    #[error("URL cannot be used as an endpoint base: {0}")]
    CannotBeABase(String),
}

/// Validates a base URL for one of the remote APIs.
///
/// Rejects:
/// - Non-HTTP(S) schemes (e.g., `file://`, `ftp://`)
/// - Plain `http://` unless the host is loopback (`localhost`, `127.0.0.1`, `::1`),
///   which is allowed so tests and local mirrors work
///
/// A trailing slash is removed so path segments can be appended uniformly.
///
/// # Examples
///
/// ```
/// use vodchat::util::validate_endpoint;
///
/// let url = validate_endpoint("https://7tv.io/v3/").unwrap();
/// assert_eq!(url.as_str(), "https://7tv.io/v3");
///
/// assert!(validate_endpoint("http://127.0.0.1:8080").is_ok());
/// assert!(validate_endpoint("http://api.example.com").is_err());
/// assert!(validate_endpoint("file:///etc/passwd").is_err());
/// ```
pub fn validate_endpoint(url_str: &str) -> Result<Url, UrlValidationError> {
    let mut url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "https" => {}
        "http" => {
            if !is_loopback_host(&url) {
                return Err(UrlValidationError::Insecure(url.to_string()));
            }
            tracing::warn!(endpoint = %url, "Using non-HTTPS endpoint (localhost only)");
        }
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.cannot_be_a_base() {
        return Err(UrlValidationError::CannotBeABase(url.to_string()));
    }

    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
    }

    Ok(url)
}

fn is_loopback_host(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if host == "localhost" {
        return true;
    }

    // Strip brackets from IPv6 addresses for parsing
    let host_for_parse = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    host_for_parse
        .parse::<IpAddr>()
        .is_ok_and(|ip| ip.is_loopback())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_endpoints_accepted() {
        assert!(validate_endpoint("https://api.betterttv.net/3").is_ok());
        assert!(validate_endpoint("https://api.ivr.fi/v2/").is_ok());
    }

    #[test]
    fn test_trailing_slash_removed() {
        let url = validate_endpoint("https://api.ivr.fi/v2/").unwrap();
        assert_eq!(url.path(), "/v2");
    }

    #[test]
    fn test_root_path_kept() {
        let url = validate_endpoint("https://logs.zonian.dev").unwrap();
        assert_eq!(url.as_str(), "https://logs.zonian.dev/");
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_endpoint("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_endpoint("ftp://example.com"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_unparseable_rejected() {
        assert!(matches!(
            validate_endpoint("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_plain_http_rejected_for_remote_hosts() {
        assert!(matches!(
            validate_endpoint("http://api-tv.supa.sh"),
            Err(UrlValidationError::Insecure(_))
        ));
        assert!(matches!(
            validate_endpoint("http://192.168.1.1:8080"),
            Err(UrlValidationError::Insecure(_))
        ));
    }

    #[test]
    fn test_plain_http_allowed_for_loopback() {
        assert!(validate_endpoint("http://localhost:3000").is_ok());
        assert!(validate_endpoint("http://127.0.0.1:8080/api").is_ok());
        assert!(validate_endpoint("http://[::1]:9000").is_ok());
    }
}
