//! Broker message types.

/// A unit of data delivered by the message bus.
///
/// The transport layer constructs it; the handler consumes it exactly once
/// and never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrokerMessage {
    /// The topic the message was published on.
    pub subject: String,
    /// Raw payload. An empty body is rejected during decoding.
    pub body: Vec<u8>,
    /// Optional reply address, carried through unchanged.
    pub reply_to: Option<String>,
}

impl BrokerMessage {
    /// Create a message without a reply address.
    pub fn new(subject: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            reply_to: None,
        }
    }

    /// Attach a reply address.
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

/// The inputs a transformation and its sink need, extracted from a
/// [`BrokerMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInput {
    /// Source topic of the inbound message.
    pub subject: String,
    /// Bytes handed to the task.
    pub payload: Vec<u8>,
    /// Storage key derived from the payload, if the envelope produced one.
    pub key: Option<String>,
    /// Reply address of the inbound message.
    pub reply_to: Option<String>,
}

impl DecodedInput {
    /// The key a store should write under: the derived key, else the subject.
    pub fn storage_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_reply_to() {
        let msg = BrokerMessage::new("orders.created", "{}").with_reply_to("_INBOX.1");
        assert_eq!(msg.subject, "orders.created");
        assert_eq!(msg.body, b"{}");
        assert_eq!(msg.reply_to.as_deref(), Some("_INBOX.1"));
    }

    #[test]
    fn storage_key_falls_back_to_subject() {
        let mut input = DecodedInput {
            subject: "ingest.raw".into(),
            payload: b"x".to_vec(),
            key: None,
            reply_to: None,
        };
        assert_eq!(input.storage_key(), "ingest.raw");

        input.key = Some("k1".into());
        assert_eq!(input.storage_key(), "k1");
    }
}
