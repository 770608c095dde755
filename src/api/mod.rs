use crate::config::Config;
use crate::error::AppError;
use crate::services::batch_service::BatchService;
use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::propagate_header::PropagateHeaderLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod batches;
pub mod health;
pub mod middleware;
pub mod schemas;
pub mod timeouts;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub batch_service: BatchService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub batch_service: BatchService,
}

/// Configures and returns the sandbox API router.
pub fn app_router(config: Config, batch_service: BatchService) -> Router {
    let edge_filter = config.edge.enabled;
    let state = AppState { config, batch_service };

    let routes = Router::new()
        .route("/api/v1/send", post(batches::send_batch))
        .route("/_timeout_408", get(timeouts::request_timeout))
        .route("/_timeout_504", get(timeouts::gateway_timeout))
        .route("/_timeout", get(timeouts::simulate))
        .fallback(not_found)
        .layer(from_fn(middleware::require_acceptable));

    let routes = if edge_filter { routes.layer(from_fn(middleware::shape_response)) } else { routes };

    routes
        .layer(PropagateHeaderLayer::new(HeaderName::from_static(CORRELATION_ID_HEADER)))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .and_then(|id| id.header_value().to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let correlation_id = request
                        .headers()
                        .get(CORRELATION_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "correlation_id" = %correlation_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        let status = response.status();
                        span.record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), middleware::MakeRequestUuid))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
