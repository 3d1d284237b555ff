//! # Listener configuration and validation.
//!
//! [`ListenerConfig`] is the input to `start_listener`. All three components
//! of the key are required; validation happens synchronously, before any
//! subscribe or spawn attempt, and rejects empty identifiers with
//! [`StartError::InvalidConfig`].

use crate::error::StartError;
use crate::listeners::{ListenerKey, StoreId, SubscriberRef};

/// Configuration for one listener slot.
///
/// ## Example
/// ```rust
/// use streamvisor::{ChannelSink, ListenerConfig, SubscriberRef};
///
/// let (sink, _rx) = ChannelSink::pair(16);
/// let config = ListenerConfig::new(
///     "tenant-a",
///     "greenhouse-42",
///     SubscriberRef::new("projector", sink),
/// );
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct ListenerConfig {
    /// Store (tenant) the stream lives in.
    pub store_id: String,
    /// Stream to subscribe to.
    pub stream_id: String,
    /// Delivery target for forwarded events.
    pub subscriber: SubscriberRef,
}

impl ListenerConfig {
    /// Creates a listener configuration.
    pub fn new(
        store_id: impl Into<String>,
        stream_id: impl Into<String>,
        subscriber: SubscriberRef,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            stream_id: stream_id.into(),
            subscriber,
        }
    }

    /// Validates the configuration and derives the listener key.
    ///
    /// Fails with [`StartError::InvalidConfig`] naming the first missing
    /// field. An identifier consisting solely of whitespace counts as
    /// missing.
    pub fn validate(&self) -> Result<ListenerKey, StartError> {
        if self.store_id.trim().is_empty() {
            return Err(StartError::InvalidConfig { field: "store_id" });
        }
        if self.stream_id.trim().is_empty() {
            return Err(StartError::InvalidConfig { field: "stream_id" });
        }
        if self.subscriber.id().as_str().trim().is_empty() {
            return Err(StartError::InvalidConfig { field: "subscriber" });
        }

        Ok(ListenerKey::new(
            StoreId::new(self.store_id.as_str()),
            self.stream_id.as_str(),
            self.subscriber.id().clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::ChannelSink;

    fn subscriber(id: &str) -> SubscriberRef {
        let (sink, _rx) = ChannelSink::pair(4);
        SubscriberRef::new(id, sink)
    }

    #[test]
    fn valid_config_yields_key() {
        let cfg = ListenerConfig::new("t", "s", subscriber("sub"));
        let key = cfg.validate().expect("valid");
        assert_eq!(key.store().as_str(), "t");
        assert_eq!(key.stream(), "s");
        assert_eq!(key.subscriber().as_str(), "sub");
    }

    #[test]
    fn empty_fields_are_rejected_in_order() {
        let cfg = ListenerConfig::new("", "s", subscriber("sub"));
        match cfg.validate() {
            Err(StartError::InvalidConfig { field }) => assert_eq!(field, "store_id"),
            other => panic!("unexpected: {other:?}"),
        }

        let cfg = ListenerConfig::new("t", "  ", subscriber("sub"));
        match cfg.validate() {
            Err(StartError::InvalidConfig { field }) => assert_eq!(field, "stream_id"),
            other => panic!("unexpected: {other:?}"),
        }

        let cfg = ListenerConfig::new("t", "s", subscriber(""));
        match cfg.validate() {
            Err(StartError::InvalidConfig { field }) => assert_eq!(field, "subscriber"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
