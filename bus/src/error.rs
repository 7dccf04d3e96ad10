use std::any::Any;

use thiserror::Error;

use crate::{ClientId, RegistrationId};

/// Failure raised by a single listener while handling a message.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listener reported an error
    #[error("listener failed: {0}")]
    Failed(#[from] anyhow::Error),

    /// The listener panicked; the payload is the panic message when it was a string
    #[error("listener panicked: {0}")]
    Panicked(String),

    /// The receiving end of a channel listener is gone
    #[error("listener channel closed")]
    Disconnected,
}

impl ListenerError {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        ListenerError::Panicked(message)
    }
}

/// One failed delivery within a broadcast
#[derive(Debug)]
pub struct ListenerFailure {
    pub registration: RegistrationId,
    pub error: ListenerError,
}

/// Returned by a broadcast when one or more listeners failed.
///
/// Whether the remaining listeners still ran is decided by [`crate::FailurePolicy`].
#[derive(Debug, Error)]
#[error("{} of {attempted} listeners failed for message from {client}", .failures.len())]
pub struct DeliveryError {
    pub client: ClientId,
    /// Listeners invoked before delivery finished or stopped
    pub attempted: usize,
    pub failures: Vec<ListenerFailure>,
}

impl DeliveryError {
    /// Listeners that handled the message without failing
    pub fn delivered(&self) -> usize { self.attempted - self.failures.len() }
}
