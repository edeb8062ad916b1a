use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::core::errors::{LookupError, Result};

/// Lookup endpoint used when none is configured.
pub const DEFAULT_KEYSERVER_URL: &str = "https://pgp.mit.edu/pks/lookup";

/// Upper bound on bytes read from any single keyserver response.
///
/// Enough for an index page or one key wrapped in HTML. Anything past it
/// is dropped before parsing.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 10_000;

/// Settings for talking to the keyserver.
///
/// Every field has a default, so a TOML fragment only needs the values it
/// changes:
///
/// ```toml
/// keyserver_url = "https://keys.example.org/pks/lookup"
/// max_response_bytes = 20000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    /// Full URL of the `/pks/lookup` endpoint.
    pub keyserver_url: String,
    pub max_response_bytes: usize,
    pub user_agent: String,
    /// Limit on establishing the TCP/TLS connection. The caller's context
    /// still bounds the whole lookup.
    pub connect_timeout_secs: Option<u64>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            keyserver_url: DEFAULT_KEYSERVER_URL.to_string(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: format!("pks-lookup/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_secs: None,
        }
    }
}

impl LookupConfig {
    /// Default settings pointed at a different lookup endpoint.
    pub fn for_keyserver(url: impl Into<String>) -> Self {
        Self {
            keyserver_url: url.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a TOML fragment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| LookupError::InvalidConfig {
            detail: format!("Failed to parse lookup config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that could never produce a working lookup.
    pub fn validate(&self) -> Result<()> {
        let url = self.parsed_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LookupError::InvalidConfig {
                detail: format!(
                    "keyserver_url must use http or https, got '{}'",
                    url.scheme()
                ),
            });
        }
        if self.max_response_bytes == 0 {
            return Err(LookupError::InvalidConfig {
                detail: "max_response_bytes must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// The lookup endpoint as a URL.
    pub fn parsed_url(&self) -> Result<Url> {
        Url::parse(&self.keyserver_url).map_err(|e| LookupError::InvalidConfig {
            detail: format!("invalid keyserver_url '{}': {e}", self.keyserver_url),
        })
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}
