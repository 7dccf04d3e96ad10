use serde::{Deserialize, Serialize};

/// What a broadcast does when a listener fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep delivering to the remaining listeners and report every failure at the end
    #[default]
    Continue,
    /// Stop at the first failing listener
    Abort,
}

/// Hub settings. Deserializable so an embedding application can keep it in its own config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub failure_policy: FailurePolicy,
    /// Catch listener panics and report them as [`crate::ListenerError::Panicked`].
    /// When off, a panicking listener unwinds through the broadcaster.
    pub isolate_panics: bool,
}

impl Default for HubConfig {
    fn default() -> Self { Self { failure_policy: FailurePolicy::Continue, isolate_panics: true } }
}

impl HubConfig {
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_isolate_panics(mut self, isolate: bool) -> Self {
        self.isolate_panics = isolate;
        self
    }
}
