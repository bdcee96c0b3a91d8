use std::collections::HashMap;

use base64::Engine as _;
use bytes::Bytes;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::api::NotifyError;

/// Outer pub/sub push envelope. `message` stays optional so a delivery
/// without one becomes a typed error instead of a crash further down.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushEnvelope {
    pub message: Option<PubSubMessage>,
    /// Accepted and retained, but nothing downstream filters on it.
    #[serde(default)]
    pub subscription: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubSubMessage {
    pub attributes: Option<EventAttributes>,
    /// Base64 of the inner storage event JSON.
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub message_id: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub publish_time: Option<OffsetDateTime>,
}

/// Event metadata the storage service attaches to each pub/sub message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttributes {
    #[serde(default)]
    pub bucket_id: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub event_time: Option<OffsetDateTime>,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub notification_config: String,
    #[serde(default)]
    pub object_generation: String,
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub payload_format: String,
    #[serde(default)]
    pub overwrote_generation: String,
    #[serde(default)]
    pub overwritten_by_generation: String,
}

/// The object change event recovered from the base64 `data` field.
///
/// `size`, `generation` and `metageneration` arrive as decimal strings
/// because the source encodes them as JSON strings to dodge number
/// precision limits.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageObjectEvent {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub self_link: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub generation: String,
    #[serde(default)]
    pub metageneration: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub time_created: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated: Option<OffsetDateTime>,
    #[serde(default)]
    pub storage_class: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub time_storage_class_updated: Option<OffsetDateTime>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub md5_hash: String,
    #[serde(default)]
    pub media_link: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub crc32c: String,
    #[serde(default)]
    pub etag: String,
}

/// Flattened record combining envelope metadata and the inner object
/// event. Built once per request, handed to the sink, then dropped.
#[derive(Clone, Debug)]
pub struct BucketNotification {
    pub event_type: String,
    pub metadata: HashMap<String, String>,
    pub size: i64,
    pub md5_hash: String,
    pub time_created: Option<OffsetDateTime>,
    pub updated: Option<OffsetDateTime>,
    pub bucket: String,
    pub generation: i64,
    pub metageneration: i64,
    pub name: String,
    pub publish_time: Option<OffsetDateTime>,
    pub message_id: String,
    pub overwrote_generation: String,
    pub overwritten_by_generation: String,
}

/// Lenient base-10 conversion for the stringly-numeric counters. A value
/// that does not parse (empty, non-numeric, out of range) comes out as
/// zero instead of failing the decode, so one bad counter cannot hide the
/// rest of the event. Intentional; do not tighten.
fn parse_or_zero(value: &str) -> i64 {
    value.parse().unwrap_or_default()
}

impl BucketNotification {
    /// Decode a raw push delivery into a flat notification record.
    ///
    /// Pure transformation: no logging, no state. The caller owns both
    /// the body size cap and the reporting of failures.
    pub fn from_bytes(bytes: Bytes) -> Result<BucketNotification, NotifyError> {
        let envelope = serde_json::from_slice::<PushEnvelope>(&bytes)
            .map_err(NotifyError::MalformedEnvelope)?;
        let message = envelope.message.ok_or(NotifyError::MissingMessage)?;
        let attributes = message.attributes.ok_or(NotifyError::MissingAttributes)?;

        let payload = base64::engine::general_purpose::STANDARD.decode(&message.data)?;
        let event = serde_json::from_slice::<StorageObjectEvent>(&payload)
            .map_err(NotifyError::MalformedInnerEvent)?;

        Ok(BucketNotification {
            event_type: attributes.event_type,
            metadata: event.metadata,
            size: parse_or_zero(&event.size),
            md5_hash: event.md5_hash,
            time_created: event.time_created,
            updated: event.updated,
            bucket: event.bucket,
            generation: parse_or_zero(&event.generation),
            metageneration: parse_or_zero(&event.metageneration),
            name: event.name,
            publish_time: message.publish_time,
            message_id: message.message_id,
            overwrote_generation: attributes.overwrote_generation,
            overwritten_by_generation: attributes.overwritten_by_generation,
        })
    }
}
