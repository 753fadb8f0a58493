//! The message-handling envelope.
//!
//! A [`Handler`] owns one task, one sink and one logger, and drives every
//! inbound message through the same linear pipeline:
//!
//! ```text
//! received -> validate -> prepare sink -> decode -> execute -> deliver -> done
//!                  \            \             \          \          \
//!                   +------------+-------------+----------+----------+--> failure
//! ```
//!
//! Each failure short-circuits the remaining stages and is logged exactly
//! once, at the level of the failing stage.

use crate::{
    envelope::MessageEnvelope,
    logging::{Scope, TracingLogger, format_duration},
    runner::TaskRunner,
    sinks::{KeyValueWriter, Publisher},
    target::{PublishTarget, StoreTarget},
};
use courier_core::{
    BrokerMessage, KeyValueStore, Logger, Outcome, OutcomeResult, Publish, Receipt, Sink, Task,
};
use std::time::Instant;
use tracing::Instrument;

/// Where an invocation currently is. Only used for trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Decoding,
    Executing,
    Delivering,
    Done,
}

fn enter(phase: Phase) {
    tracing::trace!(?phase, "phase");
}

/// A component: one task wired to one sink.
///
/// A handler holds no per-message state, so a single instance can serve
/// any number of concurrent invocations.
///
/// # Example
///
/// ```rust,ignore
/// let handler = Handler::publisher(
///     PublishTarget::new("numbers.doubled"),
///     bus,
///     |input: &[u8]| input.to_vec(),
/// );
///
/// handler.handle_message(message).await?;
/// ```
pub struct Handler<S, T, L = TracingLogger> {
    component: String,
    envelope: MessageEnvelope,
    runner: TaskRunner<T>,
    sink: S,
    logger: L,
}

impl<S: Sink, T: Task> Handler<S, T> {
    /// Build a handler from its parts. The component name defaults to the
    /// sink kind's conventional name.
    pub fn new(envelope: MessageEnvelope, sink: S, task: T) -> Self {
        Self {
            component: sink.kind().default_component().to_string(),
            envelope,
            runner: TaskRunner::new(task),
            sink,
            logger: TracingLogger,
        }
    }
}

impl<P: Publish, T: Task> Handler<Publisher<P>, T> {
    /// A publish component: raw body in, task output republished on
    /// `target`.
    pub fn publisher(target: PublishTarget, publish: P, task: T) -> Self {
        Self::new(MessageEnvelope::Raw, Publisher::new(target, publish), task)
    }
}

impl<K: KeyValueStore, T: Task> Handler<KeyValueWriter<K>, T> {
    /// A key-value component: JSON record in, task output stored in the
    /// target bucket.
    pub fn key_value(target: StoreTarget, store: K, task: T) -> Self {
        let envelope = MessageEnvelope::Record(target.key_strategy.clone());
        Self::new(envelope, KeyValueWriter::new(target, store), task)
    }
}

impl<S, T, L> Handler<S, T, L> {
    /// Replace the logger.
    pub fn with_logger<L2: Logger>(self, logger: L2) -> Handler<S, T, L2> {
        Handler {
            component: self.component,
            envelope: self.envelope,
            runner: self.runner,
            sink: self.sink,
            logger,
        }
    }

    /// Override the component name records are tagged with.
    pub fn named(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    /// The component name records are tagged with.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// How inbound messages are decoded.
    pub fn envelope(&self) -> &MessageEnvelope {
        &self.envelope
    }

    /// The output strategy.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The wrapped transformation.
    pub fn task(&self) -> &T {
        self.runner.task()
    }
}

impl<S: Sink, T: Task, L: Logger> Handler<S, T, L> {
    /// Run one message through the pipeline.
    ///
    /// Never panics and never returns early: every path ends in an
    /// [`Outcome`].
    pub async fn process(&self, message: &BrokerMessage) -> Outcome {
        let span = tracing::info_span!(
            "handle_message",
            component = %self.component,
            subject = %message.subject
        );
        self.invoke(message).instrument(span).await
    }

    /// Host entry point: `Ok(())` once the output was delivered, the
    /// failure reason otherwise.
    pub async fn handle_message(&self, message: BrokerMessage) -> Result<(), String> {
        self.process(&message).await.into_host_result()
    }

    async fn invoke(&self, message: &BrokerMessage) -> Outcome {
        let started = Instant::now();
        let log = Scope::new(&self.logger, &self.component, &message.subject);
        enter(Phase::Idle);

        log.info("received message", &[("len", message.body.len().to_string())]);

        match self.pipeline(message, &log).await {
            Ok((value, receipt)) => {
                enter(Phase::Done);
                let kind = self.sink.kind();
                log.info(
                    kind.completion_message(),
                    &[
                        (kind.destination_field(), receipt.destination),
                        ("bytes", receipt.bytes.to_string()),
                        ("duration", format_duration(started.elapsed())),
                    ],
                );
                Outcome::Success { value }
            }
            Err(failure) => {
                log.failure(&failure, started.elapsed());
                Outcome::Failure(failure)
            }
        }
    }

    async fn pipeline(
        &self,
        message: &BrokerMessage,
        log: &Scope<'_, L>,
    ) -> OutcomeResult<(Vec<u8>, Receipt)> {
        MessageEnvelope::validate(message)?;
        let lease = self.sink.prepare().await?;

        enter(Phase::Decoding);
        let input = self.envelope.decode(message)?;

        enter(Phase::Executing);
        let output = self.runner.run(&input.payload, log)?;

        enter(Phase::Delivering);
        let receipt = self.sink.deliver(lease, &output, &input).await?;

        Ok((output, receipt))
    }
}
