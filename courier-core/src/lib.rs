//! # courier-core
//!
//! Core types and capability traits for the Courier message envelope.
//!
//! This crate has minimal dependencies and is meant to be imported by hosts
//! and transports that only need to speak the envelope's interfaces.
//!
//! # Pipeline
//!
//! One inbound [`BrokerMessage`] produces exactly one observable effect:
//!
//! ```text
//! BrokerMessage ─▶ decode ─▶ Task ─▶ Sink ─▶ Outcome
//!                    │         │       │
//!                    └─────────┴───────┴──▶ Failure (first stage wins)
//! ```
//!
//! - [`Task`] - the user transformation, the only business logic
//! - [`Sink`] - publish-reply or key-value persist
//! - [`Outcome`] / [`Failure`] - the terminal value, tagged with a [`FailureStage`]
//!
//! # Capabilities
//!
//! The envelope consumes three external capabilities and owns none of them:
//! [`Publish`], [`KeyValueStore`], and [`Logger`].

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod capability;
mod error;
mod log;
mod message;
mod outcome;
mod sink;
mod task;

// Re-exports
pub use capability::{DynPublish, KeyValueStore, Publish};
pub use error::{BoxError, TaskError};
pub use log::{Level, LogRecord, Logger, NoopLogger};
pub use message::{BrokerMessage, DecodedInput};
pub use outcome::{Failure, FailureStage, Outcome, OutcomeResult};
pub use sink::{Receipt, Sink, SinkKind};
pub use task::{Identity, IntoTaskOutput, Task};
