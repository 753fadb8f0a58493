//! # External Capabilities
//!
//! The envelope never talks to a bus or a store directly. It is handed
//! capabilities at construction time and calls them at most once per message.
//!
//! - [`Publish`] - emit a message on the bus
//! - [`KeyValueStore`] - open a bucket and set a value in it
//!
//! # Static vs Dynamic Dispatch
//!
//! Both traits use native `async fn` for static dispatch. Hosts that pick a
//! transport at runtime can box a publisher as [`DynPublish`].

use crate::{error::BoxError, message::BrokerMessage};
use std::{future::Future, pin::Pin, sync::Arc};

/// Publish capability of the message bus.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot publish broker messages",
    label = "missing `Publish` implementation",
    note = "Publishers must implement `publish` for `BrokerMessage`."
)]
pub trait Publish: Send + Sync + 'static {
    /// Publish one message. Called once; the envelope never retries.
    fn publish(&self, message: BrokerMessage)
    -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Object-safe version of [`Publish`].
pub trait DynPublish: Send + Sync + 'static {
    /// Publish one message (dynamic dispatch version).
    fn publish_dyn(
        &self,
        message: BrokerMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + '_>>;
}

impl<T: Publish> DynPublish for T {
    fn publish_dyn(
        &self,
        message: BrokerMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + '_>> {
        Box::pin(self.publish(message))
    }
}

impl Publish for Box<dyn DynPublish> {
    async fn publish(&self, message: BrokerMessage) -> Result<(), BoxError> {
        (**self).publish_dyn(message).await
    }
}

impl<T: Publish> Publish for Arc<T> {
    fn publish(
        &self,
        message: BrokerMessage,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        (**self).publish(message)
    }
}

/// Key-value store capability.
///
/// `open` resolves a bucket by name; `set` writes bytes under a key in an
/// opened bucket. Neither call is retried.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Handle to an opened bucket.
    type Bucket: Send + Sync;

    /// Open (or resolve) the named bucket.
    fn open(&self, bucket: &str) -> impl Future<Output = Result<Self::Bucket, BoxError>> + Send;

    /// Write `value` under `key`.
    fn set(
        &self,
        bucket: &Self::Bucket,
        key: &str,
        value: &[u8],
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

impl<T: KeyValueStore> KeyValueStore for Arc<T> {
    type Bucket = T::Bucket;

    fn open(&self, bucket: &str) -> impl Future<Output = Result<Self::Bucket, BoxError>> + Send {
        (**self).open(bucket)
    }

    fn set(
        &self,
        bucket: &Self::Bucket,
        key: &str,
        value: &[u8],
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        (**self).set(bucket, key, value)
    }
}
