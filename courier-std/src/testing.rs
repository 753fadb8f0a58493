//! Testing utilities for Courier.
//!
//! In-memory stand-ins for the external capabilities, so handlers can be
//! exercised without a bus or a store.
//!
//! # Features
//!
//! - [`RecordingPublisher`]: records published messages, can be told to fail
//! - [`MemoryStore`]: an in-memory key-value store with failure injection
//! - [`RecordingLogger`]: keeps every log record
//! - [`Journal`]: a shared timeline of capability calls and log lines

use courier_core::{BoxError, BrokerMessage, KeyValueStore, Level, LogRecord, Logger, Publish};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Journal
// ============================================================================

/// A shared, ordered record of what happened during a test.
///
/// Entries look like `publish numbers.doubled`, `open default`,
/// `set ingest.raw` or `log info message processed`.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// A copy of all entries, in order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Position of the first entry equal to `entry`.
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries.lock().unwrap().iter().position(|e| e == entry)
    }
}

// ============================================================================
// Recording Publisher
// ============================================================================

/// A publisher that records every message it is asked to publish.
///
/// # Example
///
/// ```rust,ignore
/// let outbox = RecordingPublisher::new();
/// let handler = Handler::publisher(target, outbox.clone(), task);
///
/// handler.process(&message).await;
/// assert_eq!(outbox.messages().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    messages: Arc<Mutex<Vec<BrokerMessage>>>,
    attempts: Arc<AtomicUsize>,
    error: Arc<Mutex<Option<String>>>,
    journal: Option<Journal>,
}

impl RecordingPublisher {
    /// Create a publisher that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also record calls in `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Make every following publish fail with `error`.
    pub fn fail_with(&self, error: impl Into<String>) {
        *self.error.lock().unwrap() = Some(error.into());
    }

    /// Accept publishes again.
    pub fn clear_error(&self) {
        *self.error.lock().unwrap() = None;
    }

    /// Messages accepted so far.
    pub fn messages(&self) -> Vec<BrokerMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Number of publish calls, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Publish for RecordingPublisher {
    async fn publish(&self, message: BrokerMessage) -> Result<(), BoxError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.push(format!("publish {}", message.subject));
        }

        if let Some(err) = self.error.lock().unwrap().clone() {
            return Err(err.into());
        }

        self.messages.lock().unwrap().push(message);
        Ok(())
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// Handle returned by [`MemoryStore::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBucket {
    name: String,
}

impl MemoryBucket {
    /// The bucket name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An in-memory key-value store.
///
/// Buckets are created on first open. Opening and setting can each be
/// programmed to fail.
#[derive(Clone, Default)]
pub struct MemoryStore {
    buckets: Arc<Mutex<HashMap<String, BTreeMap<String, Vec<u8>>>>>,
    open_calls: Arc<AtomicUsize>,
    set_calls: Arc<AtomicUsize>,
    open_error: Arc<Mutex<Option<String>>>,
    set_error: Arc<Mutex<Option<String>>>,
    journal: Option<Journal>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also record calls in `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Make every following open fail with `error`.
    pub fn fail_open(&self, error: impl Into<String>) {
        *self.open_error.lock().unwrap() = Some(error.into());
    }

    /// Make every following set fail with `error`.
    pub fn fail_set(&self, error: impl Into<String>) {
        *self.set_error.lock().unwrap() = Some(error.into());
    }

    /// Read a stored value.
    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Number of keys in `bucket`.
    pub fn len(&self, bucket: &str) -> usize {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .map_or(0, BTreeMap::len)
    }

    /// Returns `true` when `bucket` holds no keys.
    pub fn is_empty(&self, bucket: &str) -> bool {
        self.len(bucket) == 0
    }

    /// Number of open calls, failed ones included.
    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Number of set calls, failed ones included.
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryStore {
    type Bucket = MemoryBucket;

    async fn open(&self, bucket: &str) -> Result<MemoryBucket, BoxError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.push(format!("open {bucket}"));
        }

        if let Some(err) = self.open_error.lock().unwrap().clone() {
            return Err(err.into());
        }

        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default();
        Ok(MemoryBucket {
            name: bucket.to_string(),
        })
    }

    async fn set(&self, bucket: &MemoryBucket, key: &str, value: &[u8]) -> Result<(), BoxError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.push(format!("set {key}"));
        }

        if let Some(err) = self.set_error.lock().unwrap().clone() {
            return Err(err.into());
        }

        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.name.clone())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

// ============================================================================
// Recording Logger
// ============================================================================

/// A logger that keeps every record.
#[derive(Clone, Default)]
pub struct RecordingLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
    journal: Option<Journal>,
}

impl RecordingLogger {
    /// Create an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also record log lines in `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// A copy of all records.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Records at `level` or above.
    pub fn at_least(&self, level: Level) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.level >= level)
            .cloned()
            .collect()
    }

    /// The first record with `message`, if any.
    pub fn find(&self, message: &str) -> Option<LogRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.message == message)
            .cloned()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, component: &str, message: &str, fields: &[(&str, String)]) {
        if let Some(journal) = &self.journal {
            journal.push(format!("log {level} {message}"));
        }
        self.records
            .lock()
            .unwrap()
            .push(LogRecord::capture(level, component, message, fields));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn journal_interleaves_capabilities() {
        let journal = Journal::new();
        let store = MemoryStore::new().with_journal(journal.clone());
        let logger = RecordingLogger::new().with_journal(journal.clone());

        let bucket = store.open("default").await.unwrap();
        store.set(&bucket, "k1", b"v").await.unwrap();
        logger.log(Level::Info, "KVWriter", "stored message", &[]);

        assert_eq!(
            journal.entries(),
            vec!["open default", "set k1", "log info stored message"]
        );
        assert_eq!(journal.position("set k1"), Some(1));
        assert_eq!(store.len("default"), 1);
        assert!(store.is_empty("other"));
    }

    #[tokio::test]
    async fn publisher_failure_toggles() {
        let outbox = RecordingPublisher::new();
        outbox.fail_with("nats: timeout");
        assert!(outbox.publish(BrokerMessage::new("a", "x")).await.is_err());

        outbox.clear_error();
        outbox.publish(BrokerMessage::new("a", "x")).await.unwrap();

        assert_eq!(outbox.attempts(), 2);
        assert_eq!(outbox.messages().len(), 1);
    }
}
