//! Configuration for the products worker service

use core_config::{
    app_info, env_or_default, env_parse_or, AppInfo, ConfigError, Environment, FromEnv,
};
use domain_products::Subjects;
use messaging::nats::NatsConfig;

pub const DEFAULT_SUBJECT_PREFIX: &str = "products";
pub const DEFAULT_QUEUE_GROUP: &str = "products-workers";
pub const DEFAULT_MAX_CONCURRENT_HANDLERS: usize = 64;
pub const DEFAULT_METRICS_PORT: u16 = 9091;

/// Subscription settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Subject namespace, e.g. `products` for `products.create`
    pub subject_prefix: String,
    /// Queue group shared by every worker instance
    pub queue_group: String,
    /// Upper bound on dispatches running at once in this process
    pub max_concurrent_handlers: usize,
}

impl WorkerConfig {
    pub fn subjects(&self) -> Subjects {
        Subjects::new(self.subject_prefix.clone())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            queue_group: DEFAULT_QUEUE_GROUP.to_string(),
            max_concurrent_handlers: DEFAULT_MAX_CONCURRENT_HANDLERS,
        }
    }
}

impl FromEnv for WorkerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_concurrent_handlers =
            env_parse_or("MAX_CONCURRENT_HANDLERS", DEFAULT_MAX_CONCURRENT_HANDLERS)?;
        if max_concurrent_handlers == 0 {
            return Err(ConfigError::ParseError {
                key: "MAX_CONCURRENT_HANDLERS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            subject_prefix: env_or_default("SUBJ_PREFIX", DEFAULT_SUBJECT_PREFIX),
            queue_group: env_or_default("QUEUE", DEFAULT_QUEUE_GROUP),
            max_concurrent_handlers,
        })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub nats: NatsConfig,
    pub worker: WorkerConfig,
    /// Port of the health and metrics listener
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            nats: NatsConfig::from_env()?,
            worker: WorkerConfig::from_env()?,
            metrics_port: env_parse_or("METRICS_PORT", DEFAULT_METRICS_PORT)?,
        })
    }
}
