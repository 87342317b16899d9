//! Connection settings for NATS.

use core_config::{env_or_default, ConfigError, FromEnv};

/// NATS connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatsConfig {
    /// Comma-separated server URLs (e.g. "nats://a:4222,nats://b:4222")
    pub urls: String,

    /// Connection name reported to the server
    pub client_name: String,
}

impl NatsConfig {
    pub fn new(urls: impl Into<String>) -> Self {
        Self {
            urls: urls.into(),
            ..Default::default()
        }
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Individual server URLs, trimmed, empty entries skipped.
    pub fn servers(&self) -> Vec<String> {
        self.urls
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            urls: "nats://localhost:4222".to_string(),
            client_name: "products".to_string(),
        }
    }
}

impl FromEnv for NatsConfig {
    /// - NATS_URLS: defaults to nats://localhost:4222
    /// - NATS_CLIENT_NAME: defaults to "products"
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            urls: env_or_default("NATS_URLS", &defaults.urls),
            client_name: env_or_default("NATS_CLIENT_NAME", &defaults.client_name),
        };

        if config.servers().is_empty() {
            return Err(ConfigError::ParseError {
                key: "NATS_URLS".to_string(),
                details: "no server URL given".to_string(),
            });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servers_splits_and_trims() {
        let config = NatsConfig::new("nats://a:4222, nats://b:4222,,");
        assert_eq!(config.servers(), vec!["nats://a:4222", "nats://b:4222"]);
    }

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [("NATS_URLS", None::<&str>), ("NATS_CLIENT_NAME", None::<&str>)],
            || {
                assert_eq!(NatsConfig::from_env().unwrap(), NatsConfig::default());
            },
        );
    }

    #[test]
    fn test_from_env_rejects_blank_urls() {
        temp_env::with_var("NATS_URLS", Some(" , "), || {
            let err = NatsConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("NATS_URLS"));
        });
    }

    #[test]
    fn test_with_client_name() {
        let config = NatsConfig::default().with_client_name("products-worker");
        assert_eq!(config.client_name, "products-worker");
    }
}
