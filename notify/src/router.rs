use std::future::ready;
use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::prometheus::{setup_metrics_recorder, track_requests};
use crate::{notify, sink};

#[derive(Clone)]
pub struct State {
    pub sink: Arc<dyn sink::NotificationSink + Send + Sync>,
}

pub fn router<S: sink::NotificationSink + Send + Sync + 'static>(
    sink: S,
    metrics: bool,
) -> Router {
    let state = State {
        sink: Arc::new(sink),
    };

    // Push subscriptions are configured to POST to the root path, but the
    // original mux served every path with the same handler, so deliveries
    // to other paths get identical treatment via the fallback.
    let router = Router::new()
        .route("/", any(notify::event))
        .fallback(notify::event)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(track_requests))
        .with_state(state);

    // Don't install metrics unless asked to
    // Installing a global recorder when notify is used as a library (during tests etc)
    // does not work well.
    if metrics {
        let recorder_handle = setup_metrics_recorder();
        router.route("/metrics", get(move || ready(recorder_handle.render())))
    } else {
        router
    }
}
