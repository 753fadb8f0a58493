//! Structured logging capability.

use std::{sync::Arc, time::SystemTime};

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Timings and other diagnostics.
    Debug,
    /// Normal progress.
    Info,
    /// Rejected input.
    Warn,
    /// Task or delivery failures.
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        })
    }
}

/// The logging sink the envelope writes to.
///
/// Implementations must not affect control flow: a logger cannot fail.
pub trait Logger: Send + Sync + 'static {
    /// Emit one record. `fields` are ordered key-value pairs.
    fn log(&self, level: Level, component: &str, message: &str, fields: &[(&str, String)]);
}

impl<L: Logger> Logger for Arc<L> {
    fn log(&self, level: Level, component: &str, message: &str, fields: &[(&str, String)]) {
        (**self).log(level, component, message, fields)
    }
}

impl<L: Logger> Logger for Box<L> {
    fn log(&self, level: Level, component: &str, message: &str, fields: &[(&str, String)]) {
        (**self).log(level, component, message, fields)
    }
}

/// A logger that drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: Level, _component: &str, _message: &str, _fields: &[(&str, String)]) {}
}

/// An owned, timestamped log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity.
    pub level: Level,
    /// Name of the emitting component.
    pub component: String,
    /// Event message.
    pub message: String,
    /// Ordered key-value pairs.
    pub fields: Vec<(String, String)>,
    /// When the record was captured.
    pub timestamp: SystemTime,
}

impl LogRecord {
    /// Capture a record, stamped with the current time.
    pub fn capture(
        level: Level,
        component: &str,
        message: &str,
        fields: &[(&str, String)],
    ) -> Self {
        Self {
            level,
            component: component.to_string(),
            message: message.to_string(),
            fields: fields
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect(),
            timestamp: SystemTime::now(),
        }
    }

    /// Look up a field value by key.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<LogRecord>>);

    impl Logger for Collect {
        fn log(&self, level: Level, component: &str, message: &str, fields: &[(&str, String)]) {
            self.0
                .lock()
                .unwrap()
                .push(LogRecord::capture(level, component, message, fields));
        }
    }

    #[test]
    fn arc_logger_forwards() {
        let inner = Arc::new(Collect::default());
        let logger: Arc<Collect> = inner.clone();
        logger.log(
            Level::Info,
            "KVWriter",
            "stored message",
            &[("key", "k1".into()), ("bytes", "7".into())],
        );

        let records = inner.0.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].component, "KVWriter");
        assert_eq!(records[0].field("key"), Some("k1"));
        assert_eq!(records[0].field("missing"), None);
        assert_eq!(records[0].fields[1].0, "bytes");
    }

    #[test]
    fn level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
        assert_eq!(Level::Warn.to_string(), "warn");
    }
}
