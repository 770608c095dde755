use crate::edge::{self, Channel};
use crate::error::GatewayError;
use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Upper bound on response bodies buffered for reshaping.
const MAX_SHAPED_BODY_BYTES: usize = 10 * 1024 * 1024;

const ACCEPTABLE_MEDIA_RANGES: [&str; 4] = ["application/json", "application/vnd.api+json", "application/*", "*/*"];

/// Generates a v4 UUID `x-request-id` for requests that arrive without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}

/// True if any media range in an `Accept` header value is one we can produce.
#[must_use]
pub fn is_acceptable(accept: &str) -> bool {
    accept
        .split(',')
        .filter_map(|range| range.split(';').next())
        .map(|media| media.trim().to_ascii_lowercase())
        .any(|media| ACCEPTABLE_MEDIA_RANGES.contains(&media.as_str()))
}

/// Rejects requests whose `Accept` header rules out every JSON response type.
/// Requests without an `Accept` header are let through.
pub async fn require_acceptable(request: Request, next: Next) -> Response {
    if let Some(accept) = request.headers().get(header::ACCEPT) {
        let acceptable = accept.to_str().is_ok_and(is_acceptable);
        if !acceptable {
            return GatewayError::NotAcceptable.into_response();
        }
    }

    next.run(request).await
}

/// Runs every response through the gateway filter. Client and server errors
/// travel on the error channel, everything else on the response channel.
pub async fn shape_response(request: Request, next: Next) -> Response {
    let request_headers = request.headers().clone();
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_SHAPED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to buffer response body for shaping");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let text = std::str::from_utf8(&bytes).ok().filter(|text| !text.is_empty()).map(str::to_owned);
    let mut outbound = Channel::new(std::mem::take(&mut parts.headers), text);
    let mut unused = Channel::default();

    if parts.status.is_client_error() || parts.status.is_server_error() {
        edge::apply(&request_headers, &mut unused, &mut outbound);
    } else {
        edge::apply(&request_headers, &mut outbound, &mut unused);
    }

    parts.headers = outbound.headers;
    parts.headers.remove(header::CONTENT_LENGTH);

    let body = outbound.content.map_or_else(|| Body::from(bytes), Body::from);
    Response::from_parts(parts, body)
}
