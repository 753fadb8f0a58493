//! Task execution under panic isolation.

use crate::logging::{Scope, format_duration};
use courier_core::{Failure, Logger, OutcomeResult, Task};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    time::Instant,
};

/// Runs a [`Task`] so that nothing it does can unwind into the caller.
///
/// A panic becomes a `"task panic"` failure with the payload kept as
/// detail; a returned error becomes `"task error: <cause>"`. The elapsed
/// time is logged at debug level either way.
///
/// Isolation relies on unwinding. A component built with `panic = "abort"`
/// loses it.
#[derive(Debug, Clone, Default)]
pub struct TaskRunner<T> {
    task: T,
}

impl<T> TaskRunner<T> {
    /// The wrapped task.
    pub fn task(&self) -> &T {
        &self.task
    }
}

impl<T: Task> TaskRunner<T> {
    /// Wrap a task.
    pub fn new(task: T) -> Self {
        Self { task }
    }

    /// Invoke the task exactly once with `input`.
    pub fn run<L: Logger>(&self, input: &[u8], log: &Scope<'_, L>) -> OutcomeResult<Vec<u8>> {
        let started = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.task.execute(input)));
        let elapsed = format_duration(started.elapsed());

        match result {
            Ok(Ok(output)) => {
                log.debug(
                    "task executed",
                    &[("duration", elapsed), ("bytes", output.len().to_string())],
                );
                Ok(output)
            }
            Ok(Err(err)) => {
                log.debug(
                    "task failed",
                    &[("duration", elapsed), ("error", err.to_string())],
                );
                Err(Failure::task_error(&err))
            }
            Err(payload) => {
                let payload = panic_message(payload.as_ref());
                log.debug(
                    "task panicked",
                    &[("duration", elapsed), ("panic", payload.clone())],
                );
                Err(Failure::task_panic(payload))
            }
        }
    }
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingLogger;
    use courier_core::{FailureStage, Level, TaskError};

    fn scope(logger: &RecordingLogger) -> Scope<'_, RecordingLogger> {
        Scope::new(logger, "MessageHandler", "numbers.in")
    }

    #[test]
    fn returns_task_output() {
        let logger = RecordingLogger::new();
        let runner = TaskRunner::new(|input: &[u8]| input.to_ascii_uppercase());

        let output = runner.run(b"abc", &scope(&logger)).unwrap();

        assert_eq!(output, b"ABC");
        let records = logger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Debug);
        assert_eq!(records[0].message, "task executed");
        assert!(records[0].field("duration").is_some());
    }

    #[test]
    fn panic_is_contained() {
        let logger = RecordingLogger::new();
        let runner = TaskRunner::new(|_: &[u8]| -> Vec<u8> { panic!("divide by zero") });

        let failure = runner.run(b"1", &scope(&logger)).unwrap_err();

        assert_eq!(failure.reason(), "task panic");
        assert_eq!(failure.stage(), FailureStage::TaskExecution);
        assert_eq!(failure.detail(), Some("divide by zero"));
        let records = logger.records();
        assert_eq!(records[0].level, Level::Debug);
        assert!(records[0].field("duration").is_some());
    }

    #[test]
    fn formatted_panic_payload_is_captured() {
        let logger = RecordingLogger::new();
        let runner = TaskRunner::new(|input: &[u8]| -> Vec<u8> {
            panic!("unexpected length {}", input.len())
        });

        let failure = runner.run(b"abcd", &scope(&logger)).unwrap_err();
        assert_eq!(failure.detail(), Some("unexpected length 4"));
    }

    #[test]
    fn non_string_payload() {
        let logger = RecordingLogger::new();
        let runner =
            TaskRunner::new(|_: &[u8]| -> Vec<u8> { std::panic::panic_any(42_u32) });

        let failure = runner.run(b"x", &scope(&logger)).unwrap_err();
        assert_eq!(failure.reason(), "task panic");
        assert_eq!(failure.detail(), Some("non-string panic payload"));
    }

    #[test]
    fn returned_error_is_a_task_failure() {
        let logger = RecordingLogger::new();
        let runner = TaskRunner::new(|_: &[u8]| -> Result<Vec<u8>, TaskError> {
            Err(TaskError::Rejected("amount must be positive".into()))
        });

        let failure = runner.run(b"-3", &scope(&logger)).unwrap_err();
        assert_eq!(failure.reason(), "task error: amount must be positive");
        assert_eq!(failure.stage(), FailureStage::TaskExecution);
        assert_eq!(logger.records()[0].message, "task failed");
    }
}
