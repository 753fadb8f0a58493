//! `#[courier::task]` generated tasks.

#![cfg(feature = "macros")]

mod common;

use common::message;
use courier::{
    FailureStage, Handler, Identity, PublishTarget, StoreTarget, Task,
    testing::{MemoryStore, RecordingPublisher},
};

/// Upper-cases text.
#[courier::task]
fn shout(input: &str) -> String {
    input.to_uppercase()
}

#[courier::task]
fn double(input: String) -> Result<String, std::num::ParseIntError> {
    let n: i64 = input.trim().parse()?;
    Ok((n * 2).to_string())
}

#[courier::task]
fn reverse(input: Vec<u8>) -> Vec<u8> {
    let mut input = input;
    input.reverse();
    input
}

#[courier::task(name = "Constant")]
fn constant(_input: &[u8]) -> &'static str {
    "ok"
}

#[test]
fn text_tasks() {
    assert_eq!(shout.execute(b"hi").unwrap(), b"HI");
    assert_eq!(double.execute(b" 21 ").unwrap(), b"42");
}

#[test]
fn byte_tasks() {
    assert_eq!(reverse.execute(&[1, 2, 3]).unwrap(), vec![3, 2, 1]);
    assert_eq!(Constant.execute(b"anything").unwrap(), b"ok");
}

#[test]
fn invalid_utf8_is_a_task_error() {
    let err = shout.execute(&[0xff, 0xfe]).unwrap_err();
    assert!(err.to_string().starts_with("invalid utf-8 input"), "{err}");
}

#[test]
fn returned_error_propagates() {
    let err = double.execute(b"twenty-one").unwrap_err();
    assert_eq!(err.to_string(), "invalid digit found in string");
}

#[tokio::test]
async fn generated_task_drives_a_handler() {
    let bus = RecordingPublisher::new();
    let handler = Handler::publisher(PublishTarget::new("numbers.doubled"), bus.clone(), double);

    handler.handle_message(message("numbers.in", "21")).await.unwrap();
    let outcome = handler.process(&message("numbers.in", "x")).await;

    assert_eq!(bus.messages()[0].body, b"42");
    assert_eq!(
        outcome.failure().map(|f| f.stage()),
        Some(FailureStage::TaskExecution)
    );
}

#[tokio::test]
async fn identity_stores_payload_verbatim() {
    let store = MemoryStore::new();
    let handler = Handler::key_value(StoreTarget::default(), store.clone(), Identity);

    handler
        .handle_message(message("ingest.raw", common::record("k", "raw bytes")))
        .await
        .unwrap();

    assert_eq!(store.get("default", "k"), Some(b"raw bytes".to_vec()));
}
