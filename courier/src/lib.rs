//! # courier - Message-Handling Envelope
//!
//! `courier` wraps one user transformation (a [`Task`]) in everything a
//! pub/sub component needs around it: decoding the inbound message,
//! isolating the task, delivering its output to exactly one [`Sink`], and
//! logging each step with timing.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! #[courier::task]
//! fn double(input: &str) -> Result<String, std::num::ParseIntError> {
//!     Ok((input.trim().parse::<i64>()? * 2).to_string())
//! }
//!
//! let config = ComponentConfig::from_toml_str(r#"
//!     [sink.publish]
//!     destination_topic = "numbers.doubled"
//! "#)?;
//! let handler = config.publisher(double, bus)?;
//!
//! handler.handle_message(BrokerMessage::new("numbers.in", "21")).await?;
//! ```
//!
//! ## Guarantees
//!
//! - the task runs at most once per message
//! - a failure in any stage stops every later stage
//! - a task panic never escapes [`Handler::process`]
//! - every failure is logged exactly once

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod config;

pub use config::{ComponentConfig, ConfigError};

pub use courier_core::{
    // Errors
    BoxError,
    // Messages
    BrokerMessage,
    DecodedInput,
    // Capabilities
    DynPublish,
    // Outcomes
    Failure,
    FailureStage,
    Identity,
    IntoTaskOutput,
    KeyValueStore,
    Level,
    LogRecord,
    Logger,
    NoopLogger,
    Outcome,
    OutcomeResult,
    Publish,
    Receipt,
    // Sink
    Sink,
    SinkKind,
    // Task
    Task,
    TaskError,
};

pub use courier_std::{
    Handler, KeyStrategy, KeyValueWriter, MessageEnvelope, PublishTarget, Publisher, Scope,
    SinkTarget, StoreTarget, TaskRunner, TracingLogger,
};

/// Failure reasons reported by the standard stages.
pub mod reasons {
    pub use courier_std::{
        envelope::{EMPTY_BODY, INVALID_MESSAGE, UNMARSHAL_ERROR},
        sinks::{KV_OPEN_ERROR, KV_SET_ERROR, PUBLISH_FAILED},
    };
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use courier_std::testing::*;
}

/// Prelude module - common imports for Courier.
///
/// # Usage
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, BrokerMessage, ComponentConfig, Handler, Identity, IntoTaskOutput,
        KeyValueStore, Logger, Outcome, Publish, PublishTarget, Sink, StoreTarget, Task,
    };
}

#[cfg(feature = "macros")]
pub use courier_macros::task;
