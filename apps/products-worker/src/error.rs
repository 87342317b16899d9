use messaging::BusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    /// A subject could not be subscribed
    #[error("failed to subscribe to '{subject}' in queue group '{queue_group}': {source}")]
    Subscribe {
        subject: String,
        queue_group: String,
        #[source]
        source: BusError,
    },

    #[error("failed to drain the bus connection: {0}")]
    Drain(#[source] BusError),
}
