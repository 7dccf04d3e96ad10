use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifies the client a message is associated with.
///
/// Used both as the sender identifier of a broadcast and as the key of a
/// point-to-point subscription. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClientId(Arc<str>);

impl ClientId {
    pub fn new(id: impl AsRef<str>) -> Self { Self(Arc::from(id.as_ref())) }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str { &self.0 }
}

impl From<&str> for ClientId {
    fn from(id: &str) -> Self { Self(Arc::from(id)) }
}

impl From<String> for ClientId {
    fn from(id: String) -> Self { Self(Arc::from(id)) }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self { id.0.to_string() }
}

impl From<&ClientId> for ClientId {
    fn from(id: &ClientId) -> Self { id.clone() }
}

impl PartialEq<str> for ClientId {
    fn eq(&self, other: &str) -> bool { &*self.0 == other }
}

/// Identifies a single registration on a hub. Allocated by the hub, never reused within it.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RegistrationId(pub(crate) u64);

impl From<RegistrationId> for u64 {
    fn from(id: RegistrationId) -> Self { id.0 }
}

impl std::fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "R-{}", self.0) }
}
