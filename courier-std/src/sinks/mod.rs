//! Sink implementations.
//!
//! - [`Publisher`] - republishes the task output on a fixed topic
//! - [`KeyValueWriter`] - persists the task output in a bucket

mod key_value;
mod publisher;

pub use key_value::{KV_OPEN_ERROR, KV_SET_ERROR, KeyValueWriter};
pub use publisher::{PUBLISH_FAILED, Publisher};
