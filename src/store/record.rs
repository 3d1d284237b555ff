//! # The event record yielded by a feed.

use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;

/// One event as it appears on a live feed.
///
/// The supervision core forwards records verbatim; it never inspects
/// `data`. Payloads are [`Bytes`] so clones between the feed, the worker and
/// the sink are reference-counted, not copied.
#[derive(Clone, Debug)]
pub struct StoredEvent {
    /// Stream the event was recorded on.
    pub stream_id: Arc<str>,
    /// Position within the stream (0-based, assigned by the engine).
    pub event_number: u64,
    /// Application-level event type tag.
    pub event_type: Arc<str>,
    /// Opaque serialized payload.
    pub data: Bytes,
    /// Wall-clock time the engine recorded the event.
    pub recorded_at: SystemTime,
}

impl StoredEvent {
    /// Creates a record stamped with the current wall-clock time.
    pub fn new(
        stream_id: impl Into<Arc<str>>,
        event_number: u64,
        event_type: impl Into<Arc<str>>,
        data: Bytes,
    ) -> Self {
        Self {
            stream_id: stream_id.into(),
            event_number,
            event_type: event_type.into(),
            data,
            recorded_at: SystemTime::now(),
        }
    }
}
