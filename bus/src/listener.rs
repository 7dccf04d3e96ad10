use std::sync::Arc;

use crate::{ListenerError, MessageEvent};

/// Anything the hub can deliver a [`MessageEvent`] to.
///
/// Delivery is synchronous: `on_message` runs on the broadcasting thread and the
/// broadcaster waits for it. No hub lock is held while it runs, so a listener may
/// attach, detach or broadcast from inside `on_message`.
pub trait Listener: Send + Sync {
    /// Handle a single delivered message
    fn on_message(&self, event: &MessageEvent) -> Result<(), ListenerError>;

    /// Identity used to find this listener's registrations on detach.
    /// Handles that share state (such as clones of one observer) must return the same id.
    fn listener_id(&self) -> usize { self as *const Self as *const () as usize }
}

/// Trait for types that can be registered on a hub
pub trait IntoListener {
    fn into_listener(self) -> Arc<dyn Listener>;
}

impl IntoListener for Arc<dyn Listener> {
    fn into_listener(self) -> Arc<dyn Listener> { self }
}

/// User callback receiving `(identifier, message)`
pub(crate) type Callback = Box<dyn Fn(&str, &str) -> anyhow::Result<()> + Send + Sync + 'static>;

pub(crate) fn infallible<F>(callback: F) -> Callback
where F: Fn(&str, &str) + Send + Sync + 'static {
    Box::new(move |identifier, message| {
        callback(identifier, message);
        Ok(())
    })
}

/// Invoke `callback` for an event that carries both an identifier and a message; drop anything else.
pub(crate) fn dispatch(callback: &Callback, event: &MessageEvent) -> Result<(), ListenerError> {
    match (event.identifier(), event.message()) {
        (Some(identifier), Some(message)) => callback(identifier, message).map_err(ListenerError::Failed),
        _ => Ok(()),
    }
}

/// Listener backing a keyed callback subscription
pub(crate) struct CallbackListener(Callback);

impl CallbackListener {
    pub(crate) fn new(callback: Callback) -> Self { Self(callback) }
}

impl Listener for CallbackListener {
    fn on_message(&self, event: &MessageEvent) -> Result<(), ListenerError> { dispatch(&self.0, event) }
}

/// Forwards every delivered event into a std channel
pub struct SenderListener(std::sync::mpsc::Sender<MessageEvent>);

impl Listener for SenderListener {
    fn on_message(&self, event: &MessageEvent) -> Result<(), ListenerError> {
        self.0.send(event.clone()).map_err(|_| ListenerError::Disconnected)
    }
}

impl IntoListener for std::sync::mpsc::Sender<MessageEvent> {
    fn into_listener(self) -> Arc<dyn Listener> { Arc::new(SenderListener(self)) }
}

/// Forwards every delivered event into a tokio unbounded channel
#[cfg(feature = "tokio")]
pub struct UnboundedSenderListener(tokio::sync::mpsc::UnboundedSender<MessageEvent>);

#[cfg(feature = "tokio")]
impl Listener for UnboundedSenderListener {
    fn on_message(&self, event: &MessageEvent) -> Result<(), ListenerError> {
        self.0.send(event.clone()).map_err(|_| ListenerError::Disconnected)
    }
}

#[cfg(feature = "tokio")]
impl IntoListener for tokio::sync::mpsc::UnboundedSender<MessageEvent> {
    fn into_listener(self) -> Arc<dyn Listener> { Arc::new(UnboundedSenderListener(self)) }
}
