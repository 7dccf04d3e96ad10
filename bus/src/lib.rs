/*!
An in-process message bus for chat clients.

A [`Hub`] holds an ordered list of registrations. A sender calls [`Hub::broadcast`] with its
client identifier and a message, and every matching registration is invoked synchronously,
in attachment order, before `broadcast` returns.

Two kinds of registration share that list:
- [`Observer`]s attached with [`Observer::attach`] (or [`Hub::attach`]) receive messages from
  every client; the sender's identifier is passed along with the message.
- Keyed subscriptions made with [`Hub::subscribe`] receive messages from one client only and
  are removed when their [`Subscription`] handle is dropped.

# Basic usage

```rust
use chatbus::*;

let hub = Hub::new();
let observer = Observer::with_hub(&hub, |from, msg| println!("{from} says {msg}"));

observer.attach();
hub.broadcast("alice", "hello").unwrap(); // prints "alice says hello"
observer.detach();

// empty or missing input is ignored
assert_eq!(hub.broadcast("", "hello").unwrap(), 0);
assert_eq!(hub.broadcast("alice", None).unwrap(), 0);
```

# Scoped observation

```rust
use chatbus::*;
use std::sync::{Arc, Mutex};

let hub = Hub::new();
let seen = Arc::new(Mutex::new(Vec::new()));
let observer = {
    let seen = seen.clone();
    Observer::with_hub(&hub, move |from, msg| seen.lock().unwrap().push(format!("{from}: {msg}")))
};

// attached only while the closure runs, even if it panics
observer.scoped(|| hub.broadcast("bob", "hi").unwrap());
hub.broadcast("bob", "too late").unwrap();

assert_eq!(*seen.lock().unwrap(), ["bob: hi"]);
```

# Failing listeners

A listener that returns an error or panics does not stop the broadcast by default: the
remaining listeners still run and the failures come back as a [`DeliveryError`]. See
[`HubConfig`] and [`FailurePolicy`].
*/

mod config;
mod error;
mod event;
mod hub;
mod id;
mod listener;
mod observer;
mod subscription;

pub use config::*;
pub use error::*;
pub use event::*;
pub use hub::{Hub, Scope};
pub use id::*;
pub use listener::{IntoListener, Listener, SenderListener};
#[cfg(feature = "tokio")]
pub use listener::UnboundedSenderListener;
pub use observer::*;
pub use subscription::*;
