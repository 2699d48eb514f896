//! Router for the OAuth2 callback endpoint

use axum::{
    Router,
    routing::{any, get},
};
use std::sync::Arc;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use kintone_oauth::CallbackService;

/// Create the router serving the callback and a health probe
///
/// The endpoints will be available at:
/// - `{callback_route}`: every method is routed to the handler, which answers
///   non-GET requests with 405 itself
/// - `/health`
pub fn kintone_oauth_router(service: Arc<CallbackService>, callback_route: &str) -> Router {
    kintone_oauth_router_no_trace(service, callback_route).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as `kintone_oauth_router()` but without the HTTP tracing middleware.
///
/// Use this if you want to add your own tracing middleware.
pub fn kintone_oauth_router_no_trace(service: Arc<CallbackService>, callback_route: &str) -> Router {
    Router::new()
        .route(callback_route, any(super::callback::callback))
        .route("/health", get(health))
        .with_state(service)
}

async fn health() -> &'static str {
    "OK"
}
