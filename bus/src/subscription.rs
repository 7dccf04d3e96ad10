use crate::{ClientId, RegistrationId, hub::WeakHub};

/// Handle to a keyed subscription created by [`crate::Hub::subscribe`].
///
/// Dropping the handle unsubscribes. The handle does not keep the hub alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    hub: Option<WeakHub>,
    id: RegistrationId,
    key: ClientId,
}

impl Subscription {
    pub(crate) fn new(hub: WeakHub, id: RegistrationId, key: ClientId) -> Self { Self { hub: Some(hub), id, key } }

    pub fn id(&self) -> RegistrationId { self.id }

    /// The client this subscription listens to
    pub fn key(&self) -> &ClientId { &self.key }

    /// Remove the subscription from its hub. Returns false if the hub or the registration is already gone.
    pub fn unsubscribe(mut self) -> bool { self.release() }

    fn release(&mut self) -> bool {
        match self.hub.take().and_then(|hub| hub.upgrade()) {
            Some(hub) => hub.detach_registration(self.id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).field("key", &self.key).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) { self.release(); }
}
