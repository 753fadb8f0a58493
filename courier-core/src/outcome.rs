//! Terminal outcome of one message-processing invocation.

use crate::{error::BoxError, log::Level};
use thiserror::Error;

/// The pipeline phase at which an invocation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// Malformed or empty input.
    Validation,
    /// The transformation panicked or returned an error.
    TaskExecution,
    /// The publish or store call failed.
    SinkDelivery,
}

impl FailureStage {
    /// Level at which failures of this stage are logged.
    pub fn log_level(self) -> Level {
        match self {
            FailureStage::Validation => Level::Warn,
            FailureStage::TaskExecution | FailureStage::SinkDelivery => Level::Error,
        }
    }

    /// Stable lowercase name, used as a log field.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureStage::Validation => "validation",
            FailureStage::TaskExecution => "task_execution",
            FailureStage::SinkDelivery => "sink_delivery",
        }
    }
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed invocation.
///
/// `reason` is the human-readable string returned to the host, shaped as
/// `"<category>: <cause>"` or a bare category. `detail` holds diagnostic
/// context (a panic payload, for instance) that is logged but never returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct Failure {
    stage: FailureStage,
    reason: String,
    detail: Option<String>,
}

impl Failure {
    /// Create a failure with an explicit reason.
    pub fn new(stage: FailureStage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
            detail: None,
        }
    }

    /// A validation failure, e.g. `"empty body"`.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::new(FailureStage::Validation, reason)
    }

    /// A validation failure with an underlying cause.
    pub fn validation_cause(category: &str, cause: impl std::fmt::Display) -> Self {
        Self::new(FailureStage::Validation, format!("{category}: {cause}"))
    }

    /// The transformation panicked. The payload is kept as detail.
    pub fn task_panic(payload: impl Into<String>) -> Self {
        Self::new(FailureStage::TaskExecution, "task panic").with_detail(payload)
    }

    /// The transformation returned an error.
    pub fn task_error(err: &BoxError) -> Self {
        Self::new(FailureStage::TaskExecution, format!("task error: {err}"))
    }

    /// A publish or store call failed.
    pub fn delivery(category: &str, cause: impl std::fmt::Display) -> Self {
        Self::new(FailureStage::SinkDelivery, format!("{category}: {cause}"))
    }

    /// Attach diagnostic context.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The stage that produced this failure.
    pub fn stage(&self) -> FailureStage {
        self.stage
    }

    /// The full reason string.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The category part of the reason (text before the first `": "`).
    pub fn category(&self) -> &str {
        self.reason
            .split_once(": ")
            .map_or(self.reason.as_str(), |(category, _)| category)
    }

    /// The cause part of the reason, if any.
    pub fn cause(&self) -> Option<&str> {
        self.reason.split_once(": ").map(|(_, cause)| cause)
    }

    /// Diagnostic context, if captured.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Consume the failure, returning the reason string.
    pub fn into_reason(self) -> String {
        self.reason
    }
}

/// Uniform return value of every pipeline operation.
pub type OutcomeResult<T = ()> = Result<T, Failure>;

/// Terminal value produced by one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The sink accepted `value`, the exact bytes the task produced.
    Success {
        /// Delivered bytes.
        value: Vec<u8>,
    },
    /// Some stage failed; later stages never ran.
    Failure(Failure),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// The failure, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Failure(failure) => Some(failure),
            Outcome::Success { .. } => None,
        }
    }

    /// Collapse into the host-facing result: no payload on success, the
    /// reason string on failure.
    pub fn into_host_result(self) -> Result<(), String> {
        match self {
            Outcome::Success { .. } => Ok(()),
            Outcome::Failure(failure) => Err(failure.into_reason()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_splits_into_category_and_cause() {
        let failure = Failure::delivery("kv open error", "bucket not found");
        assert_eq!(failure.reason(), "kv open error: bucket not found");
        assert_eq!(failure.category(), "kv open error");
        assert_eq!(failure.cause(), Some("bucket not found"));
        assert_eq!(failure.stage(), FailureStage::SinkDelivery);
    }

    #[test]
    fn bare_category_has_no_cause() {
        let failure = Failure::validation("empty body");
        assert_eq!(failure.category(), "empty body");
        assert_eq!(failure.cause(), None);
        assert_eq!(failure.to_string(), "empty body");
    }

    #[test]
    fn panic_detail_stays_out_of_reason() {
        let failure = Failure::task_panic("index out of bounds");
        assert_eq!(failure.reason(), "task panic");
        assert_eq!(failure.detail(), Some("index out of bounds"));
    }

    #[test]
    fn stage_levels() {
        assert_eq!(FailureStage::Validation.log_level(), Level::Warn);
        assert_eq!(FailureStage::TaskExecution.log_level(), Level::Error);
        assert_eq!(FailureStage::SinkDelivery.log_level(), Level::Error);
    }

    #[test]
    fn host_result() {
        let ok = Outcome::Success { value: vec![1] };
        assert!(ok.is_success());
        assert_eq!(ok.into_host_result(), Ok(()));

        let err = Outcome::Failure(Failure::delivery("publish failed", "no responders"));
        assert_eq!(
            err.failure().map(Failure::stage),
            Some(FailureStage::SinkDelivery)
        );
        assert_eq!(
            err.into_host_result(),
            Err("publish failed: no responders".to_string())
        );
    }
}
