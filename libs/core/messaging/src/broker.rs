//! Message broker abstraction.
//!
//! The trait is byte-oriented. Encoding belongs to the callers,
//! which lets the gateway forward reply bytes untouched and lets tests swap
//! the NATS backend for [`crate::InMemoryBroker`].

use crate::error::BusError;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// A message delivered to a subscriber.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Subject the message was published on
    pub subject: String,
    /// Raw payload bytes
    pub payload: Bytes,
    /// Where the requester waits for the answer, if it expects one
    pub reply: Option<String>,
}

impl ReceivedMessage {
    pub fn new(subject: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            subject: subject.into(),
            payload: payload.into(),
            reply: None,
        }
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }
}

/// Abstract message broker.
///
/// Implementations:
/// - [`crate::nats::NatsBroker`] (feature `nats`)
/// - [`crate::InMemoryBroker`] for tests and single-process runs
#[async_trait]
pub trait MessageBroker: Send + Sync + 'static {
    /// Fire-and-forget publish
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), BusError>;

    /// Publish and wait for exactly one reply, bounded by `timeout`
    async fn request(
        &self,
        subject: &str,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Bytes, BusError>;

    /// Join `queue_group` on `subject`; each message goes to one group member
    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Box<dyn MessageStream>, BusError>;

    /// Wait until everything published so far has been handed to the server
    async fn flush(&self) -> Result<(), BusError>;

    /// Close the connection gracefully.
    ///
    /// Remaining subscriptions stop accepting messages, pending publishes
    /// are flushed and the connection is closed. Any later call on this
    /// connection fails.
    async fn drain(&self) -> Result<(), BusError>;
}

/// Stream of incoming messages for one subscription
#[async_trait]
pub trait MessageStream: Send {
    /// Receive the next message; `None` once the subscription is closed and empty
    async fn next(&mut self) -> Option<ReceivedMessage>;

    /// Stop accepting new messages. Messages already delivered to this
    /// subscription are still returned by [`MessageStream::next`].
    async fn unsubscribe(&mut self) -> Result<(), BusError>;
}
