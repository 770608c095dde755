use crate::api::AppState;
use crate::api::schemas::batches::SendBatchResponse;
use crate::error::Result;
use crate::services::validation::{self, RequestBody, Submission};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};

/// Accepts a message batch and answers with the routing plan's canned outcome.
///
/// # Errors
/// Returns the first structural rule the body breaks, or the rejection the
/// routing plan is configured to simulate.
pub async fn send_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SendBatchResponse>> {
    let authorization = headers.get(header::AUTHORIZATION).and_then(|value| value.to_str().ok());
    let submission = Submission::new(authorization, RequestBody::decode(&body));

    let batch = validation::validate(&submission)?;
    tracing::debug!(
        routing_plan_id = %batch.routing_plan_id,
        messages = batch.message_count(),
        "Batch passed validation"
    );

    let accepted = state.batch_service.submit(&batch)?;

    Ok(Json(accepted.into()))
}
