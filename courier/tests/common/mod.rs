#![allow(dead_code)]

use courier::BrokerMessage;
use serde::{Deserialize, Serialize};

// ============================================================================
// Test Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "Data")]
    pub data: i64,
    #[serde(rename = "Name")]
    pub name: String,
}

pub fn reading(data: i64, name: &str) -> Vec<u8> {
    serde_json::to_vec(&Reading {
        data,
        name: name.to_string(),
    })
    .unwrap()
}

pub fn record(key: &str, data: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({ "Key": key, "Data": data })).unwrap()
}

pub fn message(subject: &str, body: impl Into<Vec<u8>>) -> BrokerMessage {
    BrokerMessage::new(subject, body)
}

// ============================================================================
// Test Tasks
// ============================================================================

/// Doubles the `Data` field of a JSON reading.
pub fn double_reading(input: &[u8]) -> Result<Vec<u8>, serde_json::Error> {
    let mut reading: Reading = serde_json::from_slice(input)?;
    reading.data *= 2;
    serde_json::to_vec(&reading)
}

/// Panics on every input.
pub fn explode(_input: &[u8]) -> Vec<u8> {
    panic!("sensor offline")
}

/// Upper-cases text input.
pub fn shout(input: &[u8]) -> Vec<u8> {
    input.to_ascii_uppercase()
}
