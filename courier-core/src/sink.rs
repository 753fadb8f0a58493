//! # Output Strategy (Sink)
//!
//! A sink externalizes the task output: it either republishes it or
//! persists it. Every component instance is wired to exactly one sink.
//!
//! Delivery is split in two steps so a sink can acquire what it needs
//! (a bucket handle, for instance) before the payload is decoded:
//!
//! 1. [`Sink::prepare`] - runs once the body is known to be non-empty
//! 2. [`Sink::deliver`] - runs only after the task succeeded

use crate::{message::DecodedInput, outcome::OutcomeResult};
use std::future::Future;

/// Which kind of effect a sink produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// Re-emits a message on the bus.
    Publish,
    /// Persists a value in a key-value bucket.
    Store,
}

impl SinkKind {
    /// Component name used when none is configured.
    pub fn default_component(self) -> &'static str {
        match self {
            SinkKind::Publish => "MessageHandler",
            SinkKind::Store => "KVWriter",
        }
    }

    /// Log message emitted after a successful delivery.
    pub fn completion_message(self) -> &'static str {
        match self {
            SinkKind::Publish => "message processed",
            SinkKind::Store => "stored message",
        }
    }

    /// Field name under which the destination is logged.
    pub fn destination_field(self) -> &'static str {
        match self {
            SinkKind::Publish => "topic",
            SinkKind::Store => "key",
        }
    }
}

/// Where a delivered payload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Destination topic or storage key.
    pub destination: String,
    /// Number of bytes handed to the capability.
    pub bytes: usize,
}

/// The single output strategy of a component.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Sink`",
    label = "missing `Sink` implementation",
    note = "Sinks must implement `prepare` and `deliver`."
)]
pub trait Sink: Send + Sync + 'static {
    /// Resource acquired in [`Sink::prepare`] and consumed by [`Sink::deliver`].
    type Lease: Send;

    /// The kind of effect this sink produces.
    fn kind(&self) -> SinkKind;

    /// Acquire whatever delivery needs. Failing here stops the pipeline
    /// before the payload is decoded.
    fn prepare(&self) -> impl Future<Output = OutcomeResult<Self::Lease>> + Send;

    /// Deliver `output` exactly as produced by the task.
    fn deliver(
        &self,
        lease: Self::Lease,
        output: &[u8],
        input: &DecodedInput,
    ) -> impl Future<Output = OutcomeResult<Receipt>> + Send;
}
