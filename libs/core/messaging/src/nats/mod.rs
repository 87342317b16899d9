//! NATS backend for [`MessageBroker`](crate::MessageBroker).
//!
//! Core NATS (no JetStream): request/reply uses the client's own inbox
//! subscription, and queue groups give competing-consumer load balancing
//! across worker instances.
//!
//! ```rust,ignore
//! use messaging::nats::{NatsBroker, NatsConfig};
//! use core_config::FromEnv;
//!
//! let broker = NatsBroker::connect(&NatsConfig::from_env()?).await?;
//! let reply = broker.request("products.getall", Bytes::new(), Duration::from_millis(500)).await?;
//! ```

mod broker;
mod config;

pub use broker::NatsBroker;
pub use config::NatsConfig;
