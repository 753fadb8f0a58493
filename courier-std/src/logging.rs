//! Logging - structured, timed records for every pipeline event.
//!
//! [`TracingLogger`] is the default [`Logger`]: it forwards records to the
//! `tracing` crate. [`Scope`] binds a logger to one invocation so every
//! record carries the component name and the inbound subject.

use courier_core::{Failure, Level, Logger};
use std::{fmt, time::Duration};

/// A [`Logger`] that emits `tracing` events.
///
/// The fields the pipeline produces (`subject`, `len`, `bytes`, `topic`,
/// `key`, `stage`, `error`, `detail`, `panic`, `duration`) become
/// structured event fields. Any other pair is rendered into `extra`.
///
/// # Example
///
/// ```rust,ignore
/// tracing_subscriber::fmt().init();
/// let handler = Handler::publisher(target, publish, task).with_logger(TracingLogger);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

/// Field keys recorded as structured `tracing` fields.
const STRUCTURED: [&str; 10] = [
    "subject", "len", "bytes", "topic", "key", "stage", "error", "detail", "panic", "duration",
];

macro_rules! emit_event {
    ($level:ident, $component:expr, $message:expr, $fields:expr) => {
        tracing::$level!(
            component = %$component,
            subject = $fields.get("subject"),
            len = $fields.get("len"),
            bytes = $fields.get("bytes"),
            topic = $fields.get("topic"),
            key = $fields.get("key"),
            stage = $fields.get("stage"),
            error = $fields.get("error"),
            detail = $fields.get("detail"),
            panic = $fields.get("panic"),
            duration = $fields.get("duration"),
            extra = %$fields,
            "{}",
            $message
        )
    };
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, component: &str, message: &str, fields: &[(&str, String)]) {
        let fields = Fields(fields);
        match level {
            Level::Debug => emit_event!(debug, component, message, fields),
            Level::Info => emit_event!(info, component, message, fields),
            Level::Warn => emit_event!(warn, component, message, fields),
            Level::Error => emit_event!(error, component, message, fields),
        }
    }
}

/// Ordered fields of one record.
///
/// `Display` renders the pairs without a structured slot as `key=value`.
struct Fields<'a>(&'a [(&'a str, String)]);

impl Fields<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extra = self.0.iter().filter(|(key, _)| !STRUCTURED.contains(key));
        for (i, (key, value)) in extra.enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Render a duration the way every record does.
pub fn format_duration(elapsed: Duration) -> String {
    format!("{elapsed:?}")
}

/// A logger bound to one invocation.
///
/// The subject is always the first field, so records from concurrent
/// invocations can be told apart.
pub struct Scope<'a, L> {
    logger: &'a L,
    component: &'a str,
    subject: &'a str,
}

impl<'a, L: Logger> Scope<'a, L> {
    /// Bind `logger` to a component and an inbound subject.
    pub fn new(logger: &'a L, component: &'a str, subject: &'a str) -> Self {
        Self {
            logger,
            component,
            subject,
        }
    }

    /// The component name records are tagged with.
    pub fn component(&self) -> &str {
        self.component
    }

    /// Emit one record at `level`.
    pub fn emit(&self, level: Level, message: &str, fields: &[(&str, String)]) {
        let mut all = Vec::with_capacity(fields.len() + 1);
        all.push(("subject", self.subject.to_string()));
        all.extend_from_slice(fields);
        self.logger.log(level, self.component, message, &all);
    }

    /// Emit at debug level.
    pub fn debug(&self, message: &str, fields: &[(&str, String)]) {
        self.emit(Level::Debug, message, fields);
    }

    /// Emit at info level.
    pub fn info(&self, message: &str, fields: &[(&str, String)]) {
        self.emit(Level::Info, message, fields);
    }

    /// Emit the single record describing a failed invocation, at the level
    /// of the failing stage.
    pub fn failure(&self, failure: &Failure, elapsed: Duration) {
        let mut fields = vec![("stage", failure.stage().to_string())];
        if let Some(cause) = failure.cause() {
            fields.push(("error", cause.to_string()));
        }
        if let Some(detail) = failure.detail() {
            fields.push(("detail", detail.to_string()));
        }
        fields.push(("duration", format_duration(elapsed)));
        self.emit(failure.stage().log_level(), failure.category(), &fields);
    }
}
