use crate::api::AppState;
use crate::api::schemas::timeouts::{SleepQuery, SleepResponse};
use crate::error::GatewayError;
use axum::{
    Json,
    extract::{Query, State},
};
use std::time::Duration;

pub async fn request_timeout() -> GatewayError {
    GatewayError::RequestTimeout
}

pub async fn gateway_timeout() -> GatewayError {
    GatewayError::GatewayTimeout
}

/// Simulates a downstream call that takes `sleep` milliseconds. Calls that
/// reach the configured downstream timeout are cut off with a 504.
///
/// # Errors
/// Returns `GatewayError::GatewayTimeout` when the sleep reaches the timeout.
pub async fn simulate(
    State(state): State<AppState>,
    Query(query): Query<SleepQuery>,
) -> Result<Json<SleepResponse>, GatewayError> {
    let requested_ms = query.sleep.unwrap_or_default();
    let limit_ms = state.config.timeouts.downstream_timeout_ms;

    if requested_ms >= limit_ms {
        tokio::time::sleep(Duration::from_millis(limit_ms)).await;
        tracing::debug!(requested_ms, limit_ms, "Simulated downstream call timed out");
        return Err(GatewayError::GatewayTimeout);
    }

    tokio::time::sleep(Duration::from_millis(requested_ms)).await;
    Ok(Json(SleepResponse { slept_ms: requested_ms }))
}
