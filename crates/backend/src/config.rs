use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub const ENV_API_URL: &str = "LEGALMIND_API_URL";
pub const ENV_API_KEY: &str = "LEGALMIND_API_KEY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid api url: {raw}")]
    InvalidUrl { raw: String },
    #[error("api url must use http or https, got {scheme}")]
    UnsupportedScheme { scheme: String },
}

/// Where the backend lives and how to authenticate against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: Url,
    api_key: Option<String>,
}

impl BackendConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim();
        let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl {
            raw: trimmed.to_owned(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: url.scheme().to_owned(),
            });
        }
        Ok(Self {
            base_url: url,
            api_key: None,
        })
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Read `LEGALMIND_API_URL` and `LEGALMIND_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BackendConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured URL is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        Ok(Self::new(&base_url)?.with_api_key(lookup(ENV_API_KEY)))
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_is_empty() {
        let config = BackendConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, BackendConfig::default());
        assert_eq!(config.base_url().as_str(), "http://localhost:8000/api");
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn reads_url_and_key() {
        let config = BackendConfig::from_lookup(|key| match key {
            ENV_API_URL => Some("https://legal.example.com/api/".into()),
            ENV_API_KEY => Some("secret".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url().host_str(), Some("legal.example.com"));
        assert_eq!(config.api_key(), Some("secret"));
    }

    #[test]
    fn rejects_bad_urls() {
        assert_eq!(
            BackendConfig::new("not a url"),
            Err(ConfigError::InvalidUrl {
                raw: "not a url".into()
            })
        );
        assert_eq!(
            BackendConfig::new("ftp://example.com"),
            Err(ConfigError::UnsupportedScheme {
                scheme: "ftp".into()
            })
        );
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let config = BackendConfig::default().with_api_key(Some("  ".into()));
        assert_eq!(config.api_key(), None);
    }
}
