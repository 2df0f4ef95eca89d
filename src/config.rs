//! Configuration file parser for ~/.config/vodchat/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-request timeout for every remote API, in seconds.
    pub request_timeout_secs: u64,

    /// Optional JSON array of TLDs replacing the built-in list.
    pub tld_file: Option<PathBuf>,

    /// Base URLs of the remote APIs.
    pub endpoints: Endpoints,
}

/// Base URLs of the remote services. Validated when the API client is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// VOD archive / user directory.
    pub vods: String,
    /// Chat-log archive.
    pub logs: String,
    pub betterttv: String,
    pub frankerfacez: String,
    pub seventv: String,
    /// IVR (Twitch badge mirror).
    pub ivr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            tld_file: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            vods: "https://api-tv.supa.sh".to_string(),
            logs: "https://logs.zonian.dev".to_string(),
            betterttv: "https://api.betterttv.net/3".to_string(),
            frankerfacez: "https://api.frankerfacez.com/v1".to_string(),
            seventv: "https://7tv.io/v3".to_string(),
            ivr: "https://api.ivr.fi/v2".to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 3] = ["request_timeout_secs", "tld_file", "endpoints"];
    const KNOWN_ENDPOINTS: [&'static str; 6] =
        ["vods", "logs", "betterttv", "frankerfacez", "seventv", "ivr"];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading so a huge file is never pulled into memory
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw table first to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
            if let Some(endpoints) = raw.get("endpoints").and_then(toml::Value::as_table) {
                for key in endpoints.keys() {
                    if !Self::KNOWN_ENDPOINTS.contains(&key.as_str()) {
                        tracing::warn!(key = %key, "Unknown endpoint in config file, ignoring");
                    }
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            path = %path.display(),
            timeout_secs = config.request_timeout_secs,
            custom_tlds = config.tld_file.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Request timeout; a zero value falls back to the 10 second default.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(Config::default().request_timeout_secs),
            secs => Duration::from_secs(secs),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("vodchat_config_test_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.tld_file.is_none());
        assert_eq!(config.endpoints.vods, "https://api-tv.supa.sh");
        assert_eq!(config.endpoints.seventv, "https://7tv.io/v3");
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/vodchat_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_file_returns_default() {
        let (dir, path) = write_config("empty", "   \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_endpoints_keep_defaults() {
        let (dir, path) = write_config(
            "partial",
            "[endpoints]\nvods = \"http://127.0.0.1:9000\"\n",
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.endpoints.vods, "http://127.0.0.1:9000");
        assert_eq!(config.endpoints.logs, "https://logs.zonian.dev");
        assert_eq!(config.request_timeout_secs, 10);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
request_timeout_secs = 3
tld_file = "/etc/vodchat/tlds.json"

[endpoints]
vods = "https://vods.example.com"
logs = "https://logs.example.com"
betterttv = "https://bttv.example.com/3"
frankerfacez = "https://ffz.example.com/v1"
seventv = "https://7tv.example.com/v3"
ivr = "https://ivr.example.com/v2"
"#;
        let (dir, path) = write_config("full", content);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(
            config.tld_file.as_deref(),
            Some(Path::new("/etc/vodchat/tlds.json"))
        );
        assert_eq!(config.endpoints.ivr, "https://ivr.example.com/v2");
        assert_eq!(config.endpoints.frankerfacez, "https://ffz.example.com/v1");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config(
            "unknown",
            "theme = \"dark\"\n[endpoints]\nmystery = \"https://x.example\"\n",
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.endpoints, Endpoints::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_config("wrongtype", "request_timeout_secs = \"ten\"\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
