//! # User Transformations (Task)
//!
//! A task is the only business logic a component carries: an opaque function
//! from input bytes to output bytes. The envelope never looks inside either.
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `|input: &[u8]| input.to_ascii_uppercase()`
//! 2. **Struct implementation**: `impl Task for MyTask`
//! 3. **Attribute**: `#[courier::task] fn double(arg: &str) -> String { ... }`
//!
//! Tasks are synchronous and may panic; the runner is responsible for
//! isolating them.

use crate::error::BoxError;

/// Conversion from a task's return value into output bytes.
///
/// # Default Implementations
///
/// - `Vec<u8>`, `String`, `&'static str` → the bytes as-is
/// - `Result<T, E>` → delegates to `T`, or reports `E` as a task error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as task output",
    label = "missing `IntoTaskOutput` implementation",
    note = "Tasks must return bytes, a string, or a `Result` wrapping one of them."
)]
pub trait IntoTaskOutput {
    /// Convert into output bytes or a task error.
    fn into_task_output(self) -> Result<Vec<u8>, BoxError>;
}

impl IntoTaskOutput for Vec<u8> {
    fn into_task_output(self) -> Result<Vec<u8>, BoxError> {
        Ok(self)
    }
}

impl IntoTaskOutput for String {
    fn into_task_output(self) -> Result<Vec<u8>, BoxError> {
        Ok(self.into_bytes())
    }
}

impl IntoTaskOutput for &'static str {
    fn into_task_output(self) -> Result<Vec<u8>, BoxError> {
        Ok(self.as_bytes().to_vec())
    }
}

impl<T, E> IntoTaskOutput for Result<T, E>
where
    T: IntoTaskOutput,
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_task_output(self) -> Result<Vec<u8>, BoxError> {
        match self {
            Ok(t) => t.into_task_output(),
            Err(e) => Err(Box::new(e)),
        }
    }
}

/// A user-supplied transformation.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Task`",
    label = "missing `Task` implementation",
    note = "Implement `Task`, annotate a function with `#[courier::task]`, or pass a closure `Fn(&[u8]) -> impl IntoTaskOutput`."
)]
pub trait Task: Send + Sync + 'static {
    /// Transform one input. Called exactly once per message.
    fn execute(&self, input: &[u8]) -> Result<Vec<u8>, BoxError>;
}

// Blanket impl for closures
impl<F, Out> Task for F
where
    F: Fn(&[u8]) -> Out + Send + Sync + 'static,
    Out: IntoTaskOutput,
{
    fn execute(&self, input: &[u8]) -> Result<Vec<u8>, BoxError> {
        (self)(input).into_task_output()
    }
}

/// Passes its input through unchanged.
///
/// Key-value components use it to store the decoded payload as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Task for Identity {
    fn execute(&self, input: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(input.to_vec())
    }
}
