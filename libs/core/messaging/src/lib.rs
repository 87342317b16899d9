//! Request/reply messaging over a publish/subscribe bus.
//!
//! This library provides backend-agnostic building blocks for turning a
//! synchronous call into a bus round trip:
//! - **[`MessageBroker`]**: publish, queue-group subscribe, request with timeout
//! - **[`Envelope`]**: the success/fail/error reply wrapper
//! - **[`BusError`]**: transport failures (timeout, no responders, I/O)
//! - **[`RpcMetrics`]**: request/reply counters and latency histograms
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  request(subject)   ┌──────────────┐  queue group   ┌──────────────┐
//! │    Caller    │────────────────────▶│     Bus      │───────────────▶│  Responder   │
//! │  (gateway)   │◀────────────────────│ NATS/memory  │◀───────────────│  (worker)    │
//! └──────────────┘   Envelope bytes    └──────────────┘  publish(reply)└──────────────┘
//! ```
//!
//! # Backends
//!
//! - [`nats::NatsBroker`] (feature `nats`)
//! - [`InMemoryBroker`] (always available; tests and single-process runs)

mod broker;
mod envelope;
mod error;
mod memory;
pub mod metrics;

#[cfg(feature = "nats")]
pub mod nats;

pub use broker::{MessageBroker, MessageStream, ReceivedMessage};
pub use envelope::{Envelope, EnvelopeStatus};
pub use error::BusError;
pub use memory::InMemoryBroker;
pub use metrics::RpcMetrics;
