//! Message decoding.
//!
//! A [`MessageEnvelope`] turns an inbound [`BrokerMessage`] into the
//! [`DecodedInput`] the task and sink need. The set of variants is closed:
//! publish components use [`MessageEnvelope::Raw`], key-value components
//! use [`MessageEnvelope::Record`].

use crate::target::{DEFAULT_KEY_FIELD, KeyStrategy};
use courier_core::{BrokerMessage, DecodedInput, Failure, OutcomeResult};
use serde_json::{Map, Value};

/// Reason reported for a message without a body.
pub const EMPTY_BODY: &str = "empty body";
/// Reason reported for a record without data.
pub const INVALID_MESSAGE: &str = "invalid message";
/// Category reported when a record cannot be parsed.
pub const UNMARSHAL_ERROR: &str = "unmarshal error";

/// How a component decodes its inbound messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEnvelope {
    /// The body is the task input, untouched.
    Raw,
    /// The body is a JSON record `{ "Key": .., "Data": .. }`; `Data` is the
    /// task input and the key is derived with the given strategy. `Key` and
    /// `Data` must be strings or `null` when present.
    Record(KeyStrategy),
}

/// Field holding the task input in a key-value record.
const DATA_FIELD: &str = "Data";

/// A parsed key-value record.
///
/// Field names match exactly first, then ignoring ASCII case. A `null`
/// field reads as absent. Unknown fields are kept for key derivation.
struct StoredRecord(Map<String, Value>);

impl StoredRecord {
    fn parse(body: &[u8]) -> OutcomeResult<Self> {
        serde_json::from_slice(body)
            .map(StoredRecord)
            .map_err(|e| Failure::validation_cause(UNMARSHAL_ERROR, e))
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).or_else(|| {
            self.0
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }

    /// A field that must be text when present.
    fn text(&self, name: &str) -> OutcomeResult<Option<String>> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Failure::validation_cause(
                UNMARSHAL_ERROR,
                format!("field `{name}` must be a string, found {other}"),
            )),
        }
    }

    /// Any field, rendered as text.
    fn field(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl MessageEnvelope {
    /// Reject messages that cannot carry a payload.
    pub fn validate(message: &BrokerMessage) -> OutcomeResult {
        if message.body.is_empty() {
            return Err(Failure::validation(EMPTY_BODY));
        }
        Ok(())
    }

    /// Decode `message`. Pure: the same message always decodes the same way.
    pub fn decode(&self, message: &BrokerMessage) -> OutcomeResult<DecodedInput> {
        Self::validate(message)?;

        match self {
            MessageEnvelope::Raw => Ok(DecodedInput {
                subject: message.subject.clone(),
                payload: message.body.clone(),
                key: None,
                reply_to: message.reply_to.clone(),
            }),
            MessageEnvelope::Record(strategy) => {
                let record = StoredRecord::parse(&message.body)?;
                let data = record.text(DATA_FIELD)?.unwrap_or_default();
                record.text(DEFAULT_KEY_FIELD)?;

                if data.is_empty() {
                    return Err(Failure::validation(INVALID_MESSAGE));
                }

                let key = match strategy {
                    KeyStrategy::FromMessageSubject => None,
                    KeyStrategy::FromPayloadField(field) => {
                        record.field(field).filter(|k| !k.is_empty())
                    }
                };

                Ok(DecodedInput {
                    subject: message.subject.clone(),
                    payload: data.into_bytes(),
                    key,
                    reply_to: message.reply_to.clone(),
                })
            }
        }
    }
}
