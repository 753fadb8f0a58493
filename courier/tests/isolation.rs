//! Concurrent invocations do not affect each other.

mod common;

use common::message;
use courier::{
    Handler, Level, PublishTarget,
    testing::{RecordingLogger, RecordingPublisher},
};
use std::sync::Arc;

fn flaky(input: &[u8]) -> Vec<u8> {
    if input.starts_with(b"bad") {
        panic!("cannot process {}", String::from_utf8_lossy(input));
    }
    input.to_ascii_uppercase()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn panics_stay_inside_their_invocation() {
    let bus = RecordingPublisher::new();
    let logger = RecordingLogger::new();
    let handler = Arc::new(
        Handler::publisher(PublishTarget::new("out"), bus.clone(), flaky)
            .with_logger(logger.clone()),
    );

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let handler = handler.clone();
            let body = if i % 4 == 0 {
                format!("bad-{i}")
            } else {
                format!("ok-{i}")
            };
            let subject = format!("in.{i}");
            tokio::spawn(async move { handler.handle_message(message(&subject, body)).await })
        })
        .collect();

    let results = futures::future::join_all(tasks).await;

    let mut failed = 0;
    for result in results {
        match result.expect("invocation must not abort its tokio task") {
            Ok(()) => {}
            Err(reason) => {
                assert_eq!(reason, "task panic");
                failed += 1;
            }
        }
    }

    assert_eq!(failed, 8);
    assert_eq!(bus.messages().len(), 24);
    assert!(bus.messages().iter().all(|m| m.body.starts_with(b"OK-")));

    let failures = logger.at_least(Level::Warn);
    assert_eq!(failures.len(), 8);
    for failure in failures {
        let subject = failure.field("subject").unwrap();
        let detail = failure.field("detail").unwrap();
        let index = subject.trim_start_matches("in.");
        assert_eq!(detail, format!("cannot process bad-{index}"));
    }
}

#[tokio::test]
async fn handler_is_reusable_after_a_panic() {
    let bus = RecordingPublisher::new();
    let handler = Handler::publisher(PublishTarget::new("out"), bus.clone(), flaky);

    assert!(handler.handle_message(message("in", "bad")).await.is_err());
    assert!(handler.handle_message(message("in", "good")).await.is_ok());

    assert_eq!(bus.messages().len(), 1);
    assert_eq!(bus.messages()[0].body, b"GOOD");
}
