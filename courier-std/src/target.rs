//! Sink bindings fixed when a component is built.

use serde::{Deserialize, Serialize};

/// The record field holding the storage key by default.
pub const DEFAULT_KEY_FIELD: &str = "Key";

/// The bucket used when none is configured.
pub const DEFAULT_BUCKET: &str = "default";

/// Where a component sends its output. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkTarget {
    /// Republish to a topic.
    Publish(PublishTarget),
    /// Persist into a bucket.
    Store(StoreTarget),
}

/// Publish-reply binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishTarget {
    /// Topic every output is published on.
    pub destination_topic: String,
    /// Copy the inbound reply address onto the outbound message.
    #[serde(default)]
    pub forward_reply_to: bool,
}

impl PublishTarget {
    /// Publish to `destination_topic` without reply-to forwarding.
    pub fn new(destination_topic: impl Into<String>) -> Self {
        Self {
            destination_topic: destination_topic.into(),
            forward_reply_to: false,
        }
    }

    /// Forward the inbound reply address.
    pub fn with_reply_to_forwarding(mut self) -> Self {
        self.forward_reply_to = true;
        self
    }
}

/// Key-value persist binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTarget {
    /// Bucket to open for every message.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// How the storage key is derived.
    #[serde(default)]
    pub key_strategy: KeyStrategy,
}

impl StoreTarget {
    /// Store into `bucket`, keyed by the `Key` field with subject fallback.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key_strategy: KeyStrategy::default(),
        }
    }

    /// Override the key strategy.
    pub fn with_key_strategy(mut self, key_strategy: KeyStrategy) -> Self {
        self.key_strategy = key_strategy;
        self
    }
}

impl Default for StoreTarget {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET)
    }
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.into()
}

/// How a key-value component chooses the key it writes under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Always the inbound subject.
    FromMessageSubject,
    /// The named payload field; the subject when that field is empty or absent.
    FromPayloadField(String),
}

impl Default for KeyStrategy {
    fn default() -> Self {
        KeyStrategy::FromPayloadField(DEFAULT_KEY_FIELD.into())
    }
}
