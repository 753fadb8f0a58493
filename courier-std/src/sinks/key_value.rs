use crate::target::StoreTarget;
use courier_core::{DecodedInput, Failure, KeyValueStore, OutcomeResult, Receipt, Sink, SinkKind};

/// Category reported when the bucket cannot be opened.
pub const KV_OPEN_ERROR: &str = "kv open error";
/// Category reported when the value cannot be written.
pub const KV_SET_ERROR: &str = "kv set error";

/// Persists the task output in a bucket, byte for byte.
///
/// The bucket is opened in [`Sink::prepare`], once per message, before the
/// payload is decoded. The key is the one the envelope derived, or the
/// inbound subject when it derived none.
pub struct KeyValueWriter<S> {
    target: StoreTarget,
    store: S,
}

impl<S> KeyValueWriter<S> {
    /// Bind a store capability to a target.
    pub fn new(target: StoreTarget, store: S) -> Self {
        Self { target, store }
    }

    /// The configured target.
    pub fn target(&self) -> &StoreTarget {
        &self.target
    }
}

impl<S: KeyValueStore> Sink for KeyValueWriter<S> {
    type Lease = S::Bucket;

    fn kind(&self) -> SinkKind {
        SinkKind::Store
    }

    async fn prepare(&self) -> OutcomeResult<S::Bucket> {
        self.store
            .open(&self.target.bucket)
            .await
            .map_err(|e| Failure::delivery(KV_OPEN_ERROR, e))
    }

    async fn deliver(
        &self,
        bucket: S::Bucket,
        output: &[u8],
        input: &DecodedInput,
    ) -> OutcomeResult<Receipt> {
        let key = input.storage_key();
        self.store
            .set(&bucket, key, output)
            .await
            .map_err(|e| Failure::delivery(KV_SET_ERROR, e))?;

        Ok(Receipt {
            destination: key.to_string(),
            bytes: output.len(),
        })
    }
}
