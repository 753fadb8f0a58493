//! Component configuration.
//!
//! A component is described by a small TOML document:
//!
//! ```toml
//! name = "Doubler"
//!
//! [sink.publish]
//! destination_topic = "numbers.doubled"
//! forward_reply_to = true
//! ```
//!
//! or, for a key-value component:
//!
//! ```toml
//! [sink.store]
//! bucket = "numbers"
//! key_strategy = { from_payload_field = "Id" }
//! ```

use courier_core::{KeyValueStore, Publish, SinkKind, Task};
use courier_std::{Handler, KeyStrategy, KeyValueWriter, Publisher, SinkTarget};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Errors raised while loading a [`ComponentConfig`] or building from it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("read {path}: {source}")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid TOML or does not match the schema.
    #[error("parse: {0}")]
    Parse(#[from] toml::de::Error),

    /// The document parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// A component was built for a sink kind the config does not describe.
    #[error("sink mismatch: configured {configured:?}, requested {requested:?}")]
    SinkMismatch {
        /// The sink kind the config describes.
        configured: SinkKind,
        /// The sink kind the builder expected.
        requested: SinkKind,
    },
}

/// Everything fixed when a component is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentConfig {
    /// Component name used in log records. Defaults to the sink kind's name.
    #[serde(default)]
    pub name: Option<String>,
    /// The single output of the component.
    pub sink: SinkTarget,
}

impl ComponentConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), kind = ?config.kind(), "loaded component config");
        Ok(config)
    }

    /// The kind of sink this config describes.
    pub fn kind(&self) -> SinkKind {
        match self.sink {
            SinkTarget::Publish(_) => SinkKind::Publish,
            SinkTarget::Store(_) => SinkKind::Store,
        }
    }

    /// Reject empty names, topics, buckets and key fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ConfigError::Invalid("name must not be empty".into()));
        }
        match &self.sink {
            SinkTarget::Publish(target) => {
                if target.destination_topic.trim().is_empty() {
                    return Err(ConfigError::Invalid(
                        "destination_topic must not be empty".into(),
                    ));
                }
            }
            SinkTarget::Store(target) => {
                if target.bucket.trim().is_empty() {
                    return Err(ConfigError::Invalid("bucket must not be empty".into()));
                }
                if let KeyStrategy::FromPayloadField(field) = &target.key_strategy {
                    if field.trim().is_empty() {
                        return Err(ConfigError::Invalid(
                            "from_payload_field must name a field".into(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Build a publish component.
    pub fn publisher<T: Task, P: Publish>(
        &self,
        task: T,
        publish: P,
    ) -> Result<Handler<Publisher<P>, T>, ConfigError> {
        let SinkTarget::Publish(target) = &self.sink else {
            return Err(self.mismatch(SinkKind::Publish));
        };
        Ok(self.apply_name(Handler::publisher(target.clone(), publish, task)))
    }

    /// Build a key-value component.
    pub fn key_value_writer<T: Task, K: KeyValueStore>(
        &self,
        task: T,
        store: K,
    ) -> Result<Handler<KeyValueWriter<K>, T>, ConfigError> {
        let SinkTarget::Store(target) = &self.sink else {
            return Err(self.mismatch(SinkKind::Store));
        };
        Ok(self.apply_name(Handler::key_value(target.clone(), store, task)))
    }

    fn apply_name<S, T>(&self, handler: Handler<S, T>) -> Handler<S, T> {
        match &self.name {
            Some(name) => handler.named(name.clone()),
            None => handler,
        }
    }

    fn mismatch(&self, requested: SinkKind) -> ConfigError {
        ConfigError::SinkMismatch {
            configured: self.kind(),
            requested,
        }
    }
}
