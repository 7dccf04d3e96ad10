use std::sync::Arc;

use tracing::debug;

use crate::{
    Hub, IntoListener, Listener, ListenerError, MessageEvent, RegistrationId,
    hub::WeakHub,
    listener::{Callback, dispatch, infallible},
};

/// An Observer wraps a callback that is called with `(identifier, message)` for every
/// message delivered to it while attached.
///
/// Clones share identity: attaching one clone and detaching another removes the same
/// registration.
#[derive(Clone)]
pub struct Observer(Arc<Inner>);

struct Inner {
    // the hub attach/detach delegate to; not owned so an attached observer never keeps it alive
    hub: WeakHub,
    callback: Callback,
}

impl Observer {
    /// Create an observer for the process-wide hub. It is not attached yet.
    pub fn of<F>(callback: F) -> Self
    where F: Fn(&str, &str) + Send + Sync + 'static {
        Self::with_hub(Hub::global(), callback)
    }

    /// Create an observer for `hub`. It is not attached yet.
    pub fn with_hub<F>(hub: &Hub, callback: F) -> Self
    where F: Fn(&str, &str) + Send + Sync + 'static {
        Self::from_callback(hub, infallible(callback))
    }

    /// Like [`Observer::of`], for a callback that can fail
    pub fn try_of<F>(callback: F) -> Self
    where F: Fn(&str, &str) -> anyhow::Result<()> + Send + Sync + 'static {
        Self::try_with_hub(Hub::global(), callback)
    }

    /// Like [`Observer::with_hub`], for a callback that can fail
    pub fn try_with_hub<F>(hub: &Hub, callback: F) -> Self
    where F: Fn(&str, &str) -> anyhow::Result<()> + Send + Sync + 'static {
        Self::from_callback(hub, Box::new(callback))
    }

    fn from_callback(hub: &Hub, callback: Callback) -> Self { Self(Arc::new(Inner { hub: hub.downgrade(), callback })) }

    /// The hub this observer attaches to, if it still exists
    pub fn hub(&self) -> Option<Hub> { self.0.hub.upgrade() }

    /// Add a registration on the hub. Returns `None` if the hub has been dropped.
    pub fn attach(&self) -> Option<RegistrationId> { self.hub().map(|hub| hub.attach_listener(self.clone())) }

    /// Remove one registration from the hub
    pub fn detach(&self) -> bool { self.hub().is_some_and(|hub| hub.detach(self)) }

    /// Whether this observer holds at least one registration on its hub
    pub fn is_attached(&self) -> bool { self.hub().is_some_and(|hub| hub.attachments(self) > 0) }

    /// Attach, returning a guard that removes that registration when dropped
    pub fn attach_scoped(&self) -> AttachGuard {
        let registration = self.attach();
        AttachGuard { observer: self.clone(), registration }
    }

    /// Run `logic` with this observer attached. The observer is detached again on
    /// every exit path, including a panic unwinding out of `logic`.
    pub fn scoped<R>(&self, logic: impl FnOnce() -> R) -> R {
        let _guard = self.attach_scoped();
        logic()
    }

    /// Attach, run `logic`, detach. `None` does nothing and returns `None`.
    ///
    /// ```rust
    /// use chatbus::{Hub, Observer};
    ///
    /// let hub = Hub::new();
    /// let observer = Observer::with_hub(&hub, |from, msg| println!("{from}: {msg}"));
    /// observer.execute_wrapped(Some(|| hub.broadcast("alice", "hello")));
    /// assert!(!observer.is_attached());
    ///
    /// assert_eq!(observer.execute_wrapped(None::<fn()>), None);
    /// ```
    pub fn execute_wrapped<F, R>(&self, logic: Option<F>) -> Option<R>
    where F: FnOnce() -> R {
        logic.map(|logic| self.scoped(logic))
    }
}

impl Listener for Observer {
    fn on_message(&self, event: &MessageEvent) -> Result<(), ListenerError> { dispatch(&self.0.callback, event) }

    fn listener_id(&self) -> usize { Arc::as_ptr(&self.0) as *const () as usize }
}

impl IntoListener for Observer {
    fn into_listener(self) -> Arc<dyn Listener> { Arc::new(self) }
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_tuple("Observer").field(&self.listener_id()).finish() }
}

/// Keeps an observer attached for as long as it lives
#[must_use = "dropping an AttachGuard detaches immediately"]
pub struct AttachGuard {
    observer: Observer,
    registration: Option<RegistrationId>,
}

impl AttachGuard {
    /// The registration this guard holds, or `None` if the hub was already gone
    pub fn registration(&self) -> Option<RegistrationId> { self.registration }

    pub fn observer(&self) -> &Observer { &self.observer }
}

impl Drop for AttachGuard {
    fn drop(&mut self) {
        if let (Some(registration), Some(hub)) = (self.registration.take(), self.observer.hub()) {
            if hub.detach_registration(registration) {
                debug!(%registration, "scoped observer detached");
            }
        }
    }
}
