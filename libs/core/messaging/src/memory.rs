//! In-process broker with NATS-like delivery rules.
//!
//! - Plain subscribers all receive every message on their subject.
//! - Members of a queue group share messages: each message goes to exactly
//!   one member of each group (round-robin).
//! - Requests go through a private `_INBOX.<uuid>` subject; a request with no
//!   subscriber fails immediately with [`BusError::NoResponders`].
//!
//! - Each handle is one client connection. Clones share the connection,
//!   [`InMemoryBroker::connection`] opens another one on the same bus, and
//!   [`MessageBroker::drain`] closes only the connection it is called on.
//!
//! Subjects are matched exactly; wildcards are not supported.

use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use crate::error::BusError;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

const INBOX_PREFIX: &str = "_INBOX.";

#[derive(Clone)]
pub struct InMemoryBroker {
    inner: Arc<Inner>,
    connection: Arc<Connection>,
}

#[derive(Default)]
struct Inner {
    subscriptions: Mutex<HashMap<String, Vec<Registration>>>,
    inboxes: Mutex<HashMap<String, Inbox>>,
    next_id: AtomicU64,
    cursor: AtomicUsize,
}

struct Connection {
    id: u64,
    drained: AtomicBool,
}

struct Registration {
    id: u64,
    connection: u64,
    queue_group: Option<String>,
    tx: mpsc::UnboundedSender<ReceivedMessage>,
}

struct Inbox {
    connection: u64,
    tx: oneshot::Sender<Bytes>,
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::attach(Arc::new(Inner::default()))
    }
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new connection to the same bus
    pub fn connection(&self) -> Self {
        Self::attach(Arc::clone(&self.inner))
    }

    /// Whether [`MessageBroker::drain`] has closed this connection
    pub fn is_drained(&self) -> bool {
        self.connection.drained.load(Ordering::Acquire)
    }

    fn attach(inner: Arc<Inner>) -> Self {
        let id = inner.next_id.fetch_add(1, Ordering::Relaxed);
        Self {
            inner,
            connection: Arc::new(Connection {
                id,
                drained: AtomicBool::new(false),
            }),
        }
    }

    fn ensure_open(&self) -> Result<(), BusError> {
        if self.is_drained() {
            return Err(BusError::Closed);
        }
        Ok(())
    }

    /// Number of live subscriptions on `subject`
    pub fn subscriber_count(&self, subject: &str) -> usize {
        let subscriptions = self.inner.subscriptions.lock().unwrap_or_else(|e| e.into_inner());
        subscriptions
            .get(subject)
            .map(|regs| regs.iter().filter(|r| !r.tx.is_closed()).count())
            .unwrap_or(0)
    }

    /// Plain (non-grouped) subscription
    pub fn subscribe(&self, subject: &str) -> Box<dyn MessageStream> {
        Box::new(self.inner.register(subject, None, self.connection.id))
    }

    fn deliver(&self, subject: &str, payload: Bytes, reply: Option<String>) -> usize {
        if subject.starts_with(INBOX_PREFIX) {
            let waiter = self
                .inner
                .inboxes
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(subject);
            return match waiter {
                Some(inbox) => usize::from(inbox.tx.send(payload).is_ok()),
                None => 0,
            };
        }

        let mut subscriptions = self.inner.subscriptions.lock().unwrap_or_else(|e| e.into_inner());
        let Some(registrations) = subscriptions.get_mut(subject) else {
            return 0;
        };
        registrations.retain(|r| !r.tx.is_closed());

        let message = ReceivedMessage {
            subject: subject.to_string(),
            payload,
            reply,
        };

        let mut delivered = 0;
        let mut groups: HashMap<&str, Vec<&Registration>> = HashMap::new();
        for registration in registrations.iter() {
            match registration.queue_group.as_deref() {
                Some(group) => groups.entry(group).or_default().push(registration),
                None => {
                    if registration.tx.send(message.clone()).is_ok() {
                        delivered += 1;
                    }
                }
            }
        }

        for (group, members) in groups {
            let pick = self.inner.cursor.fetch_add(1, Ordering::Relaxed) % members.len();
            trace!(subject, group, member = members[pick].id, "Delivering to queue member");
            if members[pick].tx.send(message.clone()).is_ok() {
                delivered += 1;
            }
        }

        delivered
    }
}

impl Inner {
    fn register(
        self: &Arc<Self>,
        subject: &str,
        queue_group: Option<&str>,
        connection: u64,
    ) -> MemoryStream {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        self.subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(subject.to_string())
            .or_default()
            .push(Registration {
                id,
                connection,
                queue_group: queue_group.map(str::to_string),
                tx,
            });

        MemoryStream {
            id,
            subject: subject.to_string(),
            rx,
            broker: Arc::clone(self),
        }
    }

    fn unregister(&self, subject: &str, id: u64) {
        let mut subscriptions = self.subscriptions.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(registrations) = subscriptions.get_mut(subject) {
            registrations.retain(|r| r.id != id);
        }
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), BusError> {
        self.ensure_open()?;
        let delivered = self.deliver(subject, payload, None);
        debug!(subject, delivered, "Published message");
        Ok(())
    }

    async fn request(
        &self,
        subject: &str,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Bytes, BusError> {
        self.ensure_open()?;
        let inbox = format!("{}{}", INBOX_PREFIX, uuid::Uuid::new_v4().simple());
        let (tx, rx) = oneshot::channel();
        self.inner
            .inboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                inbox.clone(),
                Inbox {
                    connection: self.connection.id,
                    tx,
                },
            );

        if self.deliver(subject, payload, Some(inbox.clone())) == 0 {
            self.forget_inbox(&inbox);
            return Err(BusError::NoResponders(subject.to_string()));
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(BusError::request(subject, "reply inbox closed")),
            Err(_) => {
                self.forget_inbox(&inbox);
                Err(BusError::Timeout {
                    subject: subject.to_string(),
                    timeout,
                })
            }
        }
    }

    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Box<dyn MessageStream>, BusError> {
        self.ensure_open()?;
        Ok(Box::new(self.inner.register(
            subject,
            Some(queue_group),
            self.connection.id,
        )))
    }

    async fn flush(&self) -> Result<(), BusError> {
        self.ensure_open()
    }

    async fn drain(&self) -> Result<(), BusError> {
        if self.connection.drained.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let id = self.connection.id;
        // Dropping the senders ends each stream after its buffered messages
        let mut removed = 0;
        for registrations in self
            .inner
            .subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values_mut()
        {
            let before = registrations.len();
            registrations.retain(|r| r.connection != id);
            removed += before - registrations.len();
        }
        self.inner
            .inboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|_, inbox| inbox.connection != id);

        debug!(connection = id, subscriptions = removed, "Connection drained");
        Ok(())
    }
}

impl InMemoryBroker {
    fn forget_inbox(&self, inbox: &str) {
        self.inner
            .inboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(inbox);
    }
}

struct MemoryStream {
    id: u64,
    subject: String,
    rx: mpsc::UnboundedReceiver<ReceivedMessage>,
    broker: Arc<Inner>,
}

#[async_trait]
impl MessageStream for MemoryStream {
    async fn next(&mut self) -> Option<ReceivedMessage> {
        self.rx.recv().await
    }

    async fn unsubscribe(&mut self) -> Result<(), BusError> {
        self.broker.unregister(&self.subject, self.id);
        self.rx.close();
        Ok(())
    }
}

impl Drop for MemoryStream {
    fn drop(&mut self) {
        self.broker.unregister(&self.subject, self.id);
    }
}
