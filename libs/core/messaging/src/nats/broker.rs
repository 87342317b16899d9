//! NATS implementation of the MessageBroker trait

use super::config::NatsConfig;
use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use crate::error::BusError;
use async_nats::client::RequestErrorKind;
use async_nats::{Client, Subscriber};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// NATS-based message broker
#[derive(Clone)]
pub struct NatsBroker {
    client: Client,
}

impl NatsBroker {
    /// Connect to the configured server list
    pub async fn connect(config: &NatsConfig) -> Result<Self, BusError> {
        let client = async_nats::ConnectOptions::new()
            .name(&config.client_name)
            .connect(config.servers())
            .await
            .map_err(|e| BusError::Connection(format!("{} (servers: {})", e, config.urls)))?;

        info!(servers = %config.urls, name = %config.client_name, "Connected to NATS");
        Ok(Self { client })
    }
}

#[async_trait]
impl MessageBroker for NatsBroker {
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), BusError> {
        self.client
            .publish(subject.to_string(), payload)
            .await
            .map_err(|e| BusError::publish(subject, e))
    }

    #[instrument(skip(self, payload), fields(subject = %subject, bytes = payload.len()))]
    async fn request(
        &self,
        subject: &str,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Bytes, BusError> {
        let request = async_nats::Request::new()
            .payload(payload)
            .timeout(Some(timeout));

        match self.client.send_request(subject.to_string(), request).await {
            Ok(message) => {
                debug!(reply_bytes = message.payload.len(), "Received reply");
                Ok(message.payload)
            }
            Err(e) => Err(match e.kind() {
                RequestErrorKind::TimedOut => BusError::Timeout {
                    subject: subject.to_string(),
                    timeout,
                },
                RequestErrorKind::NoResponders => BusError::NoResponders(subject.to_string()),
                _ => BusError::request(subject, e),
            }),
        }
    }

    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Box<dyn MessageStream>, BusError> {
        let subscriber = self
            .client
            .queue_subscribe(subject.to_string(), queue_group.to_string())
            .await
            .map_err(|e| BusError::subscribe(subject, e))?;

        debug!(subject, queue_group, "Queue subscription registered");
        Ok(Box::new(NatsMessageStream {
            subject: subject.to_string(),
            subscriber,
        }))
    }

    async fn flush(&self) -> Result<(), BusError> {
        self.client
            .flush()
            .await
            .map_err(|e| BusError::Flush(e.to_string()))
    }

    async fn drain(&self) -> Result<(), BusError> {
        self.client
            .drain()
            .await
            .map_err(|e| BusError::Drain(e.to_string()))?;
        info!("NATS connection drained");
        Ok(())
    }
}

/// NATS message stream wrapper
struct NatsMessageStream {
    subject: String,
    subscriber: Subscriber,
}

#[async_trait]
impl MessageStream for NatsMessageStream {
    async fn next(&mut self) -> Option<ReceivedMessage> {
        self.subscriber.next().await.map(|msg| ReceivedMessage {
            subject: msg.subject.to_string(),
            payload: msg.payload,
            reply: msg.reply.map(|s| s.to_string()),
        })
    }

    async fn unsubscribe(&mut self) -> Result<(), BusError> {
        self.subscriber
            .unsubscribe()
            .await
            .map_err(|e| BusError::subscribe(&self.subject, e))
    }
}
