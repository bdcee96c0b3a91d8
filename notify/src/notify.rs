use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use http_body_util::{BodyExt, Limited};
use metrics::counter;
use tracing::instrument;

use crate::api::NotifyError;
use crate::event::BucketNotification;
use crate::prometheus::report_dropped_events;
use crate::router;

/// Largest push body we will buffer before decoding.
pub const MAX_EVENT_BODY_BYTES: usize = 1024 * 1024;

/// Catch-all endpoint for pub/sub push deliveries.
///
/// Only POST bodies are decoded. Every other method gets an empty 200:
/// the endpoint has always been permissive about probes and stray
/// requests, and push subscribers only ever POST.
#[instrument(skip_all, fields(method, message_id, event_type, bucket, object))]
pub async fn event(
    State(state): State<router::State>,
    method: Method,
    body: Body,
) -> Result<StatusCode, NotifyError> {
    tracing::Span::current().record("method", method.as_str());

    if method != Method::POST {
        return Ok(StatusCode::OK);
    }

    match process_event(&state, body).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => {
            report_dropped_events(err.to_metric_tag(), 1);
            tracing::error!("failed to process push delivery: {}", err);
            Err(err)
        }
    }
}

async fn process_event(state: &router::State, body: Body) -> Result<(), NotifyError> {
    let bytes = match Limited::new(body, MAX_EVENT_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.is::<http_body_util::LengthLimitError>() => {
            return Err(NotifyError::BodyTooLarge)
        }
        // Covers a connection dropped mid-read: no partial record gets out.
        Err(err) => return Err(NotifyError::BodyReadError(err.to_string())),
    };

    let notification = BucketNotification::from_bytes(bytes)?;

    tracing::Span::current().record("message_id", notification.message_id.as_str());
    tracing::Span::current().record("event_type", notification.event_type.as_str());
    tracing::Span::current().record("bucket", notification.bucket.as_str());
    tracing::Span::current().record("object", notification.name.as_str());

    counter!("notify_events_received_total").increment(1);

    state.sink.emit(notification).await
}
