//! Configuration for the products gateway

use core_config::{
    app_info, env_or_default, env_parse_or, server::ServerConfig, AppInfo, ConfigError,
    Environment, FromEnv,
};
use domain_products::Subjects;
use messaging::nats::NatsConfig;
use std::time::Duration;

pub const DEFAULT_SUBJECT_PREFIX: &str = "products";
pub const DEFAULT_PATH_PREFIX: &str = "/products";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 500;

/// Bus and routing settings of the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Subject namespace the workers listen on
    pub subject_prefix: String,
    /// HTTP path the product routes are mounted under
    pub path_prefix: String,
    /// Budget for one bus round trip
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn subjects(&self) -> Subjects {
        Subjects::new(self.subject_prefix.clone())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl FromEnv for GatewayConfig {
    /// - PRODUCTS_SUBJ_PREFIX: defaults to "products"
    /// - PATH_PREFIX: defaults to "/products"
    /// - REQUEST_TIMEOUT_MS: defaults to 500
    fn from_env() -> Result<Self, ConfigError> {
        let path_prefix = env_or_default("PATH_PREFIX", DEFAULT_PATH_PREFIX);
        if !path_prefix.starts_with('/') {
            return Err(ConfigError::ParseError {
                key: "PATH_PREFIX".to_string(),
                details: format!("'{}' must start with '/'", path_prefix),
            });
        }

        let timeout_ms = env_parse_or("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            return Err(ConfigError::ParseError {
                key: "REQUEST_TIMEOUT_MS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            subject_prefix: env_or_default("PRODUCTS_SUBJ_PREFIX", DEFAULT_SUBJECT_PREFIX),
            path_prefix,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub nats: NatsConfig,
    pub gateway: GatewayConfig,
    pub server: ServerConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            nats: NatsConfig::from_env()?,
            gateway: GatewayConfig::from_env()?,
            server: ServerConfig::from_env()?,
        })
    }
}
