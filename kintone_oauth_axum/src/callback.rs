use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{Method, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use kintone_oauth::{CallbackOutcome, CallbackParams, CallbackService};

use super::error::IntoResponseError;

/// Handler for the redirect from Google.
///
/// The query is taken as raw pairs, which cannot be rejected, so every
/// malformed request is answered by the service with its JSON error body.
pub(super) async fn callback(
    State(service): State<Arc<CallbackService>>,
    method: Method,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, (StatusCode, String)> {
    let params: CallbackParams = pairs.into_iter().collect();
    let outcome = service.handle_callback(&method, &params).await;
    outcome_into_response(outcome)
}

fn outcome_into_response(outcome: CallbackOutcome) -> Result<Response, (StatusCode, String)> {
    match outcome {
        CallbackOutcome::Redirect { location } => Response::builder()
            .status(StatusCode::FOUND)
            .header(LOCATION, location)
            .body(Body::empty())
            .into_response_error(),
        CallbackOutcome::Json { status, body } => Ok((status, Json(body)).into_response()),
    }
}
