use std::sync::{Arc, Mutex};

use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() { let _ = tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().try_init(); }

/// Returns a callback recording every `(identifier, message)` it receives, and a check
/// function draining what was recorded so far.
#[allow(unused)]
pub fn message_watcher() -> (impl Fn(&str, &str) + Send + Sync + Clone + 'static, impl Fn() -> Vec<(String, String)>) {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let watcher = {
        let messages = messages.clone();
        move |identifier: &str, message: &str| {
            messages.lock().unwrap().push((identifier.to_string(), message.to_string()));
        }
    };

    let check = move || {
        let messages: Vec<(String, String)> = messages.lock().unwrap().drain(..).collect();
        messages
    };

    (watcher, check)
}

#[allow(unused)]
pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> { items.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect() }
