use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("request body exceeded the read limit")]
    BodyTooLarge,
    #[error("failed to read request body: {0}")]
    BodyReadError(String),

    #[error("failed to parse pub/sub envelope: {0}")]
    MalformedEnvelope(serde_json::Error),
    #[error("envelope carries no message")]
    MissingMessage,
    #[error("message carries no attributes")]
    MissingAttributes,
    #[error("message data is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("decoded message data is not a valid storage event: {0}")]
    MalformedInnerEvent(serde_json::Error),
}

impl NotifyError {
    pub fn to_metric_tag(&self) -> &'static str {
        match self {
            NotifyError::BodyTooLarge => "body_too_large",
            NotifyError::BodyReadError(_) => "body_read_error",
            NotifyError::MalformedEnvelope(_) => "malformed_envelope",
            NotifyError::MissingMessage => "missing_message",
            NotifyError::MissingAttributes => "missing_attributes",
            NotifyError::InvalidBase64(_) => "invalid_base64",
            NotifyError::MalformedInnerEvent(_) => "malformed_inner_event",
        }
    }
}

impl IntoResponse for NotifyError {
    fn into_response(self) -> Response {
        // Pub/Sub push senders are not trusted with the failure cause: every
        // decode error is logged server-side and answered with a bare 500.
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
