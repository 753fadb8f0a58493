use crate::target::PublishTarget;
use courier_core::{
    BrokerMessage, DecodedInput, Failure, OutcomeResult, Publish, Receipt, Sink, SinkKind,
};

/// Category reported when the publish capability fails.
pub const PUBLISH_FAILED: &str = "publish failed";

/// Re-emits the task output on the configured destination topic.
pub struct Publisher<P> {
    target: PublishTarget,
    publish: P,
}

impl<P> Publisher<P> {
    /// Bind a publish capability to a target.
    pub fn new(target: PublishTarget, publish: P) -> Self {
        Self { target, publish }
    }

    /// The configured target.
    pub fn target(&self) -> &PublishTarget {
        &self.target
    }
}

impl<P: Publish> Sink for Publisher<P> {
    type Lease = ();

    fn kind(&self) -> SinkKind {
        SinkKind::Publish
    }

    async fn prepare(&self) -> OutcomeResult<()> {
        Ok(())
    }

    async fn deliver(
        &self,
        _lease: (),
        output: &[u8],
        input: &DecodedInput,
    ) -> OutcomeResult<Receipt> {
        let reply_to = if self.target.forward_reply_to {
            input.reply_to.clone()
        } else {
            None
        };
        let message = BrokerMessage {
            subject: self.target.destination_topic.clone(),
            body: output.to_vec(),
            reply_to,
        };

        self.publish
            .publish(message)
            .await
            .map_err(|e| Failure::delivery(PUBLISH_FAILED, e))?;

        Ok(Receipt {
            destination: self.target.destination_topic.clone(),
            bytes: output.len(),
        })
    }
}
