mod common;
use chatbus::*;
use common::{message_watcher, pairs};

#[test]
fn test_missing_or_empty_input_is_ignored() {
    let hub = Hub::new();
    let (watcher, check) = message_watcher();
    let observer = Observer::with_hub(&hub, watcher);
    observer.attach();

    assert_eq!(hub.broadcast(None, "x").unwrap(), 0);
    assert_eq!(hub.broadcast("id", None).unwrap(), 0);
    assert_eq!(hub.broadcast("", "x").unwrap(), 0);
    assert_eq!(hub.broadcast("id", "").unwrap(), 0);
    assert_eq!(hub.publish("", "x").unwrap(), 0);

    assert!(check().is_empty());
}

#[test]
fn test_single_attachment_single_delivery() {
    let hub = Hub::new();
    let (watcher, check) = message_watcher();
    let observer = Observer::with_hub(&hub, watcher);
    observer.attach();

    assert_eq!(hub.broadcast("A", "hello").unwrap(), 1);
    assert_eq!(check(), pairs(&[("A", "hello")]));
}

#[test]
fn test_duplicate_attachment_duplicate_delivery() {
    let hub = Hub::new();
    let (watcher, check) = message_watcher();
    let observer = Observer::with_hub(&hub, watcher);
    observer.attach();
    observer.attach();
    assert_eq!(hub.attachments(&observer), 2);

    hub.broadcast("A", "hello").unwrap();
    assert_eq!(check(), pairs(&[("A", "hello"), ("A", "hello")]));

    // one detach removes one registration
    observer.detach();
    assert_eq!(hub.attachments(&observer), 1);
    hub.broadcast("A", "again").unwrap();
    assert_eq!(check(), pairs(&[("A", "again")]));
}

#[test]
fn test_null_listener_is_ignored() {
    let hub = Hub::new();
    let (watcher, _check) = message_watcher();
    let observer = Observer::with_hub(&hub, watcher);
    observer.attach();

    assert_eq!(hub.attach(None), None);
    assert!(!hub.detach(None));
    assert_eq!(hub.attachments(&observer), 1);
    assert_eq!(hub.len(), 1);
}

#[test]
fn test_detach_unknown_listener_is_ignored() {
    let hub = Hub::new();
    let (watcher, _check) = message_watcher();
    let attached = Observer::with_hub(&hub, watcher.clone());
    let stranger = Observer::with_hub(&hub, watcher);
    attached.attach();

    assert!(!stranger.detach());
    assert!(!hub.detach(&stranger));
    assert_eq!(hub.len(), 1);
}

#[test]
fn test_attach_broadcast_detach_broadcast() {
    let hub = Hub::new();
    let (watcher, check) = message_watcher();
    let observer = Observer::with_hub(&hub, watcher);

    hub.attach(&observer);
    hub.broadcast("A", "one").unwrap();
    hub.detach(&observer);
    assert_eq!(hub.broadcast("A", "two").unwrap(), 0);

    assert_eq!(check(), pairs(&[("A", "one")]));
    assert!(hub.is_empty());
}

#[test]
fn test_observer_receives_every_client() {
    let hub = Hub::new();
    let (watcher, check) = message_watcher();
    let observer = Observer::with_hub(&hub, watcher);
    observer.attach();

    hub.broadcast("alice", "hi").unwrap();
    hub.broadcast("bob", "yo").unwrap();
    assert_eq!(check(), pairs(&[("alice", "hi"), ("bob", "yo")]));
}

#[test]
fn test_keyed_subscription_filters_by_client() {
    let hub = Hub::new();
    let (watcher, check) = message_watcher();
    let subscription = hub.subscribe("alice", watcher);
    assert_eq!(subscription.key().as_str(), "alice");

    assert_eq!(hub.publish("alice", "for you").unwrap(), 1);
    assert_eq!(hub.publish("bob", "not for you").unwrap(), 0);
    assert_eq!(check(), pairs(&[("alice", "for you")]));

    assert!(hub.unsubscribe(subscription));
    assert_eq!(hub.publish("alice", "gone").unwrap(), 0);
    assert!(check().is_empty());
}

#[test]
fn test_dropping_subscription_unsubscribes() {
    let hub = Hub::new();
    let (watcher, check) = message_watcher();
    {
        let _subscription = hub.subscribe("alice", watcher);
        assert_eq!(hub.len(), 1);
        hub.publish("alice", "inside").unwrap();
    }
    assert!(hub.is_empty());
    hub.publish("alice", "outside").unwrap();
    assert_eq!(check(), pairs(&[("alice", "inside")]));
}

#[test]
fn test_subscription_outliving_hub() {
    let (watcher, _check) = message_watcher();
    let subscription = {
        let hub = Hub::new();
        hub.subscribe("alice", watcher)
    };
    assert!(!subscription.unsubscribe());
}

#[test]
fn test_detach_registration_by_id() {
    let hub = Hub::new();
    let (watcher, check) = message_watcher();
    let observer = Observer::with_hub(&hub, watcher);
    let first = observer.attach().unwrap();
    let _second = observer.attach().unwrap();

    assert!(hub.detach_registration(first));
    assert!(!hub.detach_registration(first));
    hub.broadcast("A", "once").unwrap();
    assert_eq!(check(), pairs(&[("A", "once")]));
}

#[test]
fn test_observer_is_ignored_by_another_hub() {
    let home = Hub::new();
    let other = Hub::new();
    let (watcher, check) = message_watcher();
    let observer = Observer::with_hub(&home, watcher);

    assert_eq!(other.attach(&observer), None);
    assert!(other.is_empty());
    assert_eq!(other.broadcast("x", "not delivered").unwrap(), 0);

    observer.attach();
    assert!(!other.detach(&observer));
    assert!(observer.is_attached());
    assert!(observer.detach());
    assert!(home.is_empty());
    assert!(check().is_empty());
}

#[test]
fn test_detach_leaves_keyed_subscription() {
    let hub = Hub::new();
    let (watcher, check) = message_watcher();
    let observer = Observer::with_hub(&hub, watcher);

    let subscription = hub.subscribe_with("alice", observer.clone());
    assert!(!observer.is_attached());
    assert!(!observer.detach());

    observer.attach();
    assert!(observer.detach());
    assert_eq!(hub.len(), 1);

    hub.publish("alice", "a").unwrap();
    hub.publish("bob", "b").unwrap();
    assert_eq!(check(), pairs(&[("alice", "a")]));
    assert!(subscription.unsubscribe());
    assert!(hub.is_empty());
}

#[test]
fn test_custom_listener() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);
    impl Listener for Counter {
        fn on_message(&self, _event: &MessageEvent) -> Result<(), ListenerError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let hub = Hub::new();
    let counter = Arc::new(Counter(AtomicUsize::new(0)));
    hub.attach_listener(counter.clone() as Arc<dyn Listener>);
    hub.attach_listener(counter.clone() as Arc<dyn Listener>);

    hub.broadcast("A", "x").unwrap();
    assert_eq!(counter.0.load(Ordering::SeqCst), 2);

    assert!(hub.detach_listener(counter.as_ref()));
    hub.broadcast("A", "y").unwrap();
    assert_eq!(counter.0.load(Ordering::SeqCst), 3);
}

#[test]
fn test_global_hub_observer() {
    let (watcher, check) = message_watcher();
    let observer = Observer::of(watcher);
    // other tests in this binary never touch the global hub, so only this key is ours
    let key = "global-hub-observer";

    observer.execute_wrapped(Some(|| Hub::global().broadcast(key, "hello").unwrap()));
    assert!(!observer.is_attached());
    assert_eq!(check(), pairs(&[(key, "hello")]));
}
