use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock, Weak};

use tracing::{debug, trace, warn};

use crate::{
    ClientId, DeliveryError, FailurePolicy, HubConfig, IntoListener, Listener, ListenerError, ListenerFailure, MessageEvent, Observer,
    RegistrationId, Subscription,
    listener::{CallbackListener, infallible},
};

static GLOBAL: OnceLock<Hub> = OnceLock::new();

/// Which broadcasts a registration receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every broadcast, whatever client it came from
    All,
    /// Only broadcasts from this client
    Client(ClientId),
}

impl Scope {
    pub fn matches(&self, key: &ClientId) -> bool {
        match self {
            Scope::All => true,
            Scope::Client(client) => client == key,
        }
    }
}

struct Registration {
    id: RegistrationId,
    scope: Scope,
    listener: Arc<dyn Listener>,
}

struct Inner {
    config: HubConfig,
    // kept in attachment order
    registrations: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl Inner {
    fn register(&self, scope: Scope, listener: Arc<dyn Listener>) -> RegistrationId {
        let id = RegistrationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(registration = %id, ?scope, "registering listener");
        self.registrations.write().unwrap().push(Registration { id, scope, listener });
        id
    }

    fn remove(&self, id: RegistrationId) -> bool {
        let mut registrations = self.registrations.write().unwrap();
        match registrations.iter().position(|r| r.id == id) {
            Some(index) => {
                registrations.remove(index);
                debug!(registration = %id, "removed registration");
                true
            }
            None => false,
        }
    }

    /// Remove the earliest all-clients registration held by the listener with this id.
    /// Keyed registrations are only removed through their subscription.
    fn remove_listener(&self, listener_id: usize) -> bool {
        let mut registrations = self.registrations.write().unwrap();
        match registrations.iter().position(|r| r.scope == Scope::All && r.listener.listener_id() == listener_id) {
            Some(index) => {
                let removed = registrations.remove(index);
                debug!(registration = %removed.id, "detached listener");
                true
            }
            None => false,
        }
    }
}

/// The shared registry and delivery point for client messages.
///
/// `Hub` is a cheap handle: clones refer to the same registrations. Broadcasts are
/// delivered synchronously on the calling thread, in attachment order, to every
/// registration whose [`Scope`] matches the sender.
#[derive(Clone)]
pub struct Hub(Arc<Inner>);

/// Non-owning reference to a hub, held by observers and subscriptions so that
/// registrations never keep their own hub alive.
#[derive(Clone)]
pub(crate) struct WeakHub(Weak<Inner>);

impl WeakHub {
    pub(crate) fn upgrade(&self) -> Option<Hub> { self.0.upgrade().map(Hub) }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub").field("registrations", &self.len()).field("config", &self.0.config).finish()
    }
}

impl Default for Hub {
    fn default() -> Self { Self::new() }
}

impl Hub {
    pub fn new() -> Self { Self::with_config(HubConfig::default()) }

    pub fn with_config(config: HubConfig) -> Self {
        Self(Arc::new(Inner { config, registrations: RwLock::new(Vec::new()), next_id: AtomicU64::new(0) }))
    }

    /// The process-wide hub, created with the default configuration on first use
    pub fn global() -> &'static Hub { GLOBAL.get_or_init(Hub::new) }

    pub fn config(&self) -> &HubConfig { &self.0.config }

    /// Register `observer` for messages from every client.
    ///
    /// Attaching the same observer again adds another registration; it is then invoked
    /// once per registration. `None`, and an observer created for a different hub, are ignored.
    pub fn attach<'a>(&self, observer: impl Into<Option<&'a Observer>>) -> Option<RegistrationId> {
        let observer = self.owned(observer.into()?)?;
        Some(self.attach_listener(observer.clone()))
    }

    /// Remove one registration of `observer`. `None`, an observer created for a different hub,
    /// or an observer that is not attached are ignored.
    pub fn detach<'a>(&self, observer: impl Into<Option<&'a Observer>>) -> bool {
        match observer.into().and_then(|observer| self.owned(observer)) {
            Some(observer) => self.0.remove_listener(observer.listener_id()),
            None => false,
        }
    }

    /// `observer`, if it was created for this hub
    fn owned<'a>(&self, observer: &'a Observer) -> Option<&'a Observer> {
        if observer.hub().is_some_and(|hub| Arc::ptr_eq(&hub.0, &self.0)) {
            Some(observer)
        } else {
            debug!(?observer, "ignoring observer created for another hub");
            None
        }
    }

    /// Register an arbitrary listener for messages from every client
    pub fn attach_listener(&self, listener: impl IntoListener) -> RegistrationId { self.0.register(Scope::All, listener.into_listener()) }

    /// Remove one all-clients registration of `listener`, matched by [`Listener::listener_id`]
    pub fn detach_listener(&self, listener: &dyn Listener) -> bool { self.0.remove_listener(listener.listener_id()) }

    /// Remove exactly the registration `id`
    pub fn detach_registration(&self, id: RegistrationId) -> bool { self.0.remove(id) }

    /// Subscribe `callback` to messages from `key` only. The subscription ends when the returned handle is dropped.
    pub fn subscribe<F>(&self, key: impl Into<ClientId>, callback: F) -> Subscription
    where F: Fn(&str, &str) + Send + Sync + 'static {
        self.subscribe_with(key, Arc::new(CallbackListener::new(infallible(callback))) as Arc<dyn Listener>)
    }

    /// Subscribe a listener (a channel sender, or any [`Listener`]) to messages from `key` only
    pub fn subscribe_with(&self, key: impl Into<ClientId>, listener: impl IntoListener) -> Subscription {
        let key = key.into();
        let id = self.0.register(Scope::Client(key.clone()), listener.into_listener());
        Subscription::new(self.downgrade(), id, key)
    }

    /// End a subscription; the same as [`Subscription::unsubscribe`] or dropping the handle.
    /// Returns false if it was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool { subscription.unsubscribe() }

    /// Broadcast `message` from `identifier` to every matching registration.
    ///
    /// If either argument is absent or empty nothing is delivered and `Ok(0)` is returned.
    /// Otherwise returns the number of listeners invoked, or the failures collected according
    /// to the configured [`FailurePolicy`].
    pub fn broadcast<'a, 'b>(
        &self,
        identifier: impl Into<Option<&'a str>>,
        message: impl Into<Option<&'b str>>,
    ) -> Result<usize, DeliveryError> {
        match (identifier.into(), message.into()) {
            (Some(identifier), Some(message)) => self.publish(identifier, message),
            _ => Ok(0),
        }
    }

    /// Deliver `payload` to registrations for `key` and to registrations for all clients
    pub fn publish(&self, key: impl Into<ClientId>, payload: &str) -> Result<usize, DeliveryError> {
        let key = key.into();
        if key.is_empty() || payload.is_empty() {
            trace!(client = %key, "ignoring broadcast with empty identifier or message");
            return Ok(0);
        }
        self.deliver(MessageEvent::new(key, payload))
    }

    /// Number of registrations currently held
    pub fn len(&self) -> usize { self.0.registrations.read().unwrap().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Number of all-clients registrations held by `listener`
    pub fn attachments(&self, listener: &dyn Listener) -> usize {
        let listener_id = listener.listener_id();
        self.0.registrations.read().unwrap().iter().filter(|r| r.scope == Scope::All && r.listener.listener_id() == listener_id).count()
    }

    pub(crate) fn downgrade(&self) -> WeakHub { WeakHub(Arc::downgrade(&self.0)) }

    fn deliver(&self, event: MessageEvent) -> Result<usize, DeliveryError> {
        // Snapshot the matching listeners so no lock is held while callbacks run
        let targets: Vec<(RegistrationId, Arc<dyn Listener>)> = {
            let registrations = self.0.registrations.read().unwrap();
            registrations.iter().filter(|r| r.scope.matches(event.key())).map(|r| (r.id, r.listener.clone())).collect()
        };

        let mut attempted = 0;
        let mut failures = Vec::new();
        for (registration, listener) in targets {
            attempted += 1;
            trace!(%registration, client = %event.key(), "delivering message");

            let outcome = if self.0.config.isolate_panics {
                panic::catch_unwind(AssertUnwindSafe(|| listener.on_message(&event))).unwrap_or_else(|payload| Err(ListenerError::from_panic(payload)))
            } else {
                listener.on_message(&event)
            };

            if let Err(error) = outcome {
                warn!(%registration, client = %event.key(), %error, "listener failed");
                failures.push(ListenerFailure { registration, error });
                if self.0.config.failure_policy == FailurePolicy::Abort {
                    break;
                }
            }
        }

        if failures.is_empty() { Ok(attempted) } else { Err(DeliveryError { client: event.key().clone(), attempted, failures }) }
    }
}
