//! Subscription lifecycle: subscribe, receive, dispatch, drain.

use crate::config::WorkerConfig;
use crate::dispatcher::handle_message;
use crate::error::WorkerError;
use domain_products::{ProductUsecase, Subjects};
use messaging::{MessageBroker, MessageStream, ReceivedMessage, RpcMetrics};
use std::sync::Arc;
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// One registered queue subscription
pub struct Subscription {
    subject: String,
    stream: Box<dyn MessageStream>,
}

impl Subscription {
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Serves every catalog operation as a member of one queue group.
pub struct ProductsWorker<B: ?Sized, U: ?Sized> {
    broker: Arc<B>,
    usecase: Arc<U>,
    subjects: Arc<Subjects>,
    config: WorkerConfig,
    metrics: RpcMetrics,
}

impl<B, U> ProductsWorker<B, U>
where
    B: MessageBroker + ?Sized,
    U: ProductUsecase + ?Sized + 'static,
{
    pub fn new(broker: Arc<B>, usecase: Arc<U>, config: WorkerConfig) -> Self {
        Self {
            broker,
            usecase,
            subjects: Arc::new(config.subjects()),
            config,
            metrics: RpcMetrics::new("products-worker"),
        }
    }

    pub fn subjects(&self) -> &Subjects {
        &self.subjects
    }

    /// Queue-subscribe to every operation subject.
    ///
    /// Fails on the first subject that cannot be subscribed. Subscriptions
    /// registered before the failure are dropped, which unregisters them.
    pub async fn subscribe_all(&self) -> Result<Vec<Subscription>, WorkerError> {
        let mut subscriptions = Vec::new();

        for (operation, subject) in self.subjects.all() {
            let stream = self
                .broker
                .queue_subscribe(&subject, &self.config.queue_group)
                .await
                .map_err(|source| WorkerError::Subscribe {
                    subject: subject.clone(),
                    queue_group: self.config.queue_group.clone(),
                    source,
                })?;

            debug!(%operation, subject = %subject, "Subscribed");
            subscriptions.push(Subscription { subject, stream });
        }

        info!(
            prefix = %self.subjects.prefix(),
            queue_group = %self.config.queue_group,
            count = subscriptions.len(),
            "All operation subjects subscribed"
        );
        Ok(subscriptions)
    }

    /// Process deliveries until `shutdown` turns true, then drain.
    ///
    /// Draining unsubscribes every subject, answers the messages that were
    /// already delivered, waits for in-flight dispatches and finally drains
    /// the connection, which flushes the replies and closes it.
    pub async fn run(
        &self,
        subscriptions: Vec<Subscription>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), WorkerError> {
        info!(
            max_concurrent = self.config.max_concurrent_handlers,
            "Starting products worker"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_handlers));
        let mut loops = JoinSet::new();

        for subscription in subscriptions {
            let receiver = Receiver {
                broker: self.broker.clone(),
                usecase: self.usecase.clone(),
                subjects: self.subjects.clone(),
                metrics: self.metrics.clone(),
                semaphore: semaphore.clone(),
            };
            loops.spawn(receiver.run(subscription, shutdown.clone()));
        }

        while let Some(result) = loops.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Receive loop panicked");
            }
        }

        self.broker.drain().await.map_err(WorkerError::Drain)?;
        info!("Products worker drained");
        Ok(())
    }
}

/// Per-subscription receive loop
struct Receiver<B: ?Sized, U: ?Sized> {
    broker: Arc<B>,
    usecase: Arc<U>,
    subjects: Arc<Subjects>,
    metrics: RpcMetrics,
    semaphore: Arc<Semaphore>,
}

impl<B, U> Receiver<B, U>
where
    B: MessageBroker + ?Sized,
    U: ProductUsecase + ?Sized + 'static,
{
    async fn run(self, mut subscription: Subscription, mut shutdown: watch::Receiver<bool>) {
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                _ = stop_requested(&mut shutdown) => break,

                Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = result {
                        error!(subject = %subscription.subject, error = %e, "Handler panicked");
                    }
                }

                message = subscription.stream.next() => match message {
                    Some(message) => self.spawn_handler(&mut in_flight, message).await,
                    None => {
                        warn!(subject = %subscription.subject, "Subscription closed");
                        break;
                    }
                },
            }
        }

        debug!(subject = %subscription.subject, "Draining subscription");
        if let Err(e) = subscription.stream.unsubscribe().await {
            warn!(subject = %subscription.subject, error = %e, "Unsubscribe failed");
        }

        while let Some(message) = subscription.stream.next().await {
            self.spawn_handler(&mut in_flight, message).await;
        }

        while let Some(result) = in_flight.join_next().await {
            if let Err(e) = result {
                error!(subject = %subscription.subject, error = %e, "Handler panicked");
            }
        }
    }

    async fn spawn_handler(&self, in_flight: &mut JoinSet<()>, message: ReceivedMessage) {
        let permit = match self.semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                error!(subject = %message.subject, "Handler pool closed, dropping message");
                return;
            }
        };

        let broker = self.broker.clone();
        let usecase = self.usecase.clone();
        let subjects = self.subjects.clone();
        let metrics = self.metrics.clone();

        in_flight.spawn(async move {
            let subject = message.subject.clone();
            if let Err(e) = handle_message(
                broker.as_ref(),
                usecase.as_ref(),
                &subjects,
                &metrics,
                message,
            )
            .await
            {
                error!(subject = %subject, error = %e, "Failed to publish reply");
            }
            drop(permit);
        });
    }
}

/// Resolve once shutdown is requested or the coordinator is gone.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
