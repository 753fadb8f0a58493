//! # courier-std
//!
//! Standard implementations for the Courier message envelope.
//!
//! This crate provides:
//! - **Decoding**: [`MessageEnvelope`] (raw bodies and JSON records)
//! - **Isolation**: [`TaskRunner`], which contains task panics
//! - **Sinks**: [`Publisher`] and [`KeyValueWriter`]
//! - **Pipeline**: [`Handler`], one task wired to one sink
//! - **Logging**: [`TracingLogger`] and the per-invocation [`Scope`]
//! - **Testing**: in-memory capabilities in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use courier_core;

pub mod envelope;
pub mod handler;
pub mod logging;
pub mod runner;
pub mod sinks;
pub mod target;
pub mod testing;

pub use envelope::MessageEnvelope;
pub use handler::Handler;
pub use logging::{Scope, TracingLogger};
pub use runner::TaskRunner;
pub use sinks::{KeyValueWriter, Publisher};
pub use target::{KeyStrategy, PublishTarget, SinkTarget, StoreTarget};
