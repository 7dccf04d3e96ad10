use std::sync::Arc;

use crate::ClientId;

/// A message handed to listeners at broadcast time. Not retained by the hub.
///
/// The event is keyed by the sender's [`ClientId`]; the identifier travels again as the
/// old value and the message as the new value. Events built by the hub always carry both,
/// but listeners must tolerate events assembled elsewhere with either side missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    key: ClientId,
    old_value: Option<Arc<str>>,
    new_value: Option<Arc<str>>,
}

impl MessageEvent {
    /// Event for a message sent by `identifier`
    pub fn new(identifier: ClientId, message: impl Into<Arc<str>>) -> Self {
        let old_value = Some(Arc::from(identifier.as_str()));
        Self { key: identifier, old_value, new_value: Some(message.into()) }
    }

    pub fn from_parts(key: ClientId, old_value: Option<Arc<str>>, new_value: Option<Arc<str>>) -> Self {
        Self { key, old_value, new_value }
    }

    /// The key this event is routed by
    pub fn key(&self) -> &ClientId { &self.key }

    /// The sender identifier, if present
    pub fn identifier(&self) -> Option<&str> { self.old_value.as_deref() }

    /// The message body, if present
    pub fn message(&self) -> Option<&str> { self.new_value.as_deref() }
}

impl std::fmt::Display for MessageEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.identifier().unwrap_or("<none>"), self.message().unwrap_or("<none>"))
    }
}
