use crate::api::MgmtState;
use crate::api::schemas::health::ReadinessResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: the sandbox is ready once its routing plans are loaded.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let routing_plans = state.batch_service.routing_plan_count();

    if routing_plans == 0 {
        tracing::warn!(component = "routing_plans", "Readiness probe failed");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse { status: "error".to_string(), routing_plans }),
        );
    }

    (StatusCode::OK, Json(ReadinessResponse { status: "ok".to_string(), routing_plans }))
}
