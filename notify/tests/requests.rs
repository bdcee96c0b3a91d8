use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use base64::Engine as _;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // for `oneshot`

use notify::router::router;
use notify::sink::PrintSink;

fn app() -> axum::Router {
    router(PrintSink {}, false)
}

fn push_body(inner: &serde_json::Value) -> String {
    let data = base64::engine::general_purpose::STANDARD.encode(inner.to_string());
    json!({
        "message": {
            "attributes": {"eventType": "OBJECT_FINALIZE"},
            "data": data,
            "messageId": "msg-1",
            "publishTime": "2024-05-06T07:08:09Z"
        },
        "subscription": "projects/demo/subscriptions/push"
    })
    .to_string()
}

async fn send(method: Method, uri: &str, body: Body) -> axum::response::Response {
    app()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn valid_push_returns_200_with_empty_body() {
    let inner = json!({
        "bucket": "b1",
        "name": "o1",
        "size": "42",
        "generation": "100",
        "metageneration": "3",
        "md5Hash": "abc"
    });

    let response = send(Method::POST, "/", Body::from(push_body(&inner))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn push_to_non_root_path_is_still_decoded() {
    let inner = json!({"bucket": "b1", "name": "o1", "size": "1"});

    let response = send(Method::POST, "/push/gcs", Body::from(push_body(&inner))).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn envelope_without_message_returns_generic_500() {
    let response = send(
        Method::POST,
        "/",
        Body::from(json!({"subscription": "s"}).to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Internal Server Error");
}

#[tokio::test]
async fn invalid_base64_returns_generic_500() {
    let body = json!({
        "message": {
            "attributes": {"eventType": "OBJECT_FINALIZE"},
            "data": "!!not-base64!!",
            "messageId": "msg-1"
        }
    })
    .to_string();

    let response = send(Method::POST, "/", Body::from(body)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Internal Server Error");
}

#[tokio::test]
async fn non_json_body_returns_generic_500() {
    let response = send(Method::POST, "/", Body::from("definitely not json")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn oversized_body_is_rejected_before_parsing() {
    // 2 MiB of valid JSON content; the cap must trip regardless of validity.
    let padding = "a".repeat(2 * 1024 * 1024);
    let body = format!("{{\"subscription\": \"{padding}\"}}");

    let response = send(Method::POST, "/", Body::from(body)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Internal Server Error");
}

#[tokio::test]
async fn connection_dropped_mid_read_returns_generic_500() {
    // Body stream fails partway through; no partial record may be logged.
    let stream = futures::stream::iter(vec![
        Ok(bytes::Bytes::from_static(b"{\"subscription\":")),
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )),
    ]);

    let response = send(Method::POST, "/", Body::from_stream(stream)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Internal Server Error");
}

#[tokio::test]
async fn get_returns_200_with_empty_body() {
    let response = send(Method::GET, "/anything", Body::empty()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn delete_on_root_returns_200() {
    let response = send(Method::DELETE, "/", Body::empty()).await;

    assert_eq!(response.status(), StatusCode::OK);
}
