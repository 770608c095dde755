//! Response shaping applied at the gateway boundary.
//!
//! A proxied exchange has two outbound channels: the regular response and the
//! error response. Both get the same content type, cache and sniffing headers,
//! lose any vendor infrastructure headers, and have their JSON bodies
//! re-serialized into compact form.

use axum::http::{HeaderMap, HeaderValue, header};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const VENDOR_JSON_CONTENT_TYPE: &str = "application/vnd.api+json";
pub const CACHE_CONTROL_VALUE: &str = "no-cache, no-store, must-revalidate";
pub const NOSNIFF: &str = "nosniff";

/// Header name prefix used by the cloud vendor for internal metadata.
const VENDOR_HEADER_PREFIX: &str = "x-amz-";

/// One outbound channel: headers plus the body as text, when there is one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub headers: HeaderMap,
    pub content: Option<String>,
}

impl Channel {
    #[must_use]
    pub const fn new(headers: HeaderMap, content: Option<String>) -> Self {
        Self { headers, content }
    }
}

/// Picks the outbound content type from the request's `Accept` header.
#[must_use]
pub fn negotiated_content_type(request_headers: &HeaderMap) -> &'static str {
    match request_headers.get(header::ACCEPT).map(HeaderValue::as_bytes) {
        Some(accept) if accept == JSON_CONTENT_TYPE.as_bytes() => JSON_CONTENT_TYPE,
        _ => VENDOR_JSON_CONTENT_TYPE,
    }
}

fn set_defaults(channel: &mut Channel, content_type: &'static str) {
    channel.headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    channel.headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    channel.headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static(NOSNIFF));
}

fn strip_vendor_headers(headers: &mut HeaderMap) {
    let vendor: Vec<_> = headers
        .keys()
        .filter(|name| name.as_str().to_ascii_lowercase().starts_with(VENDOR_HEADER_PREFIX))
        .cloned()
        .collect();

    for name in vendor {
        headers.remove(&name);
    }
}

/// Parses and re-serializes JSON content. Content that is not JSON is left as is.
fn normalize_content(content: &mut Option<String>) {
    let Some(raw) = content.as_deref() else {
        return;
    };
    if raw.is_empty() {
        return;
    }

    match serde_json::from_str::<serde_json::Value>(raw).and_then(|value| serde_json::to_string(&value)) {
        Ok(normalized) => *content = Some(normalized),
        Err(e) => tracing::trace!(error = %e, "Leaving non-JSON content untouched"),
    }
}

/// Applies the gateway defaults to both outbound channels in place.
pub fn apply(request_headers: &HeaderMap, response: &mut Channel, error: &mut Channel) {
    let content_type = negotiated_content_type(request_headers);

    for channel in [&mut *response, &mut *error] {
        set_defaults(channel, content_type);
        strip_vendor_headers(&mut channel.headers);
        normalize_content(&mut channel.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderName;

    fn request_accepting(accept: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert(header::ACCEPT, HeaderValue::from_static(accept));
        }
        headers
    }

    fn channel_with_vendor_headers(content: &str) -> Channel {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-amz-request-id"), HeaderValue::from_static("abc"));
        headers.insert(HeaderName::from_static("x-amz-apigw-id"), HeaderValue::from_static("def"));
        headers.insert(HeaderName::from_static("x-correlation-id"), HeaderValue::from_static("keep-me"));
        Channel::new(headers, Some(content.to_string()))
    }

    #[test]
    fn test_content_type_negotiation() {
        assert_eq!(negotiated_content_type(&request_accepting(Some("application/json"))), JSON_CONTENT_TYPE);
        assert_eq!(negotiated_content_type(&request_accepting(None)), VENDOR_JSON_CONTENT_TYPE);
        assert_eq!(
            negotiated_content_type(&request_accepting(Some("application/json, text/plain"))),
            VENDOR_JSON_CONTENT_TYPE
        );
        assert_eq!(negotiated_content_type(&request_accepting(Some("*/*"))), VENDOR_JSON_CONTENT_TYPE);
    }

    #[test]
    fn test_both_channels_get_defaults() {
        let mut response = Channel::default();
        let mut error = Channel::default();
        apply(&request_accepting(Some("application/json")), &mut response, &mut error);

        for channel in [&response, &error] {
            assert_eq!(channel.headers[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
            assert_eq!(channel.headers[header::CACHE_CONTROL], CACHE_CONTROL_VALUE);
            assert_eq!(channel.headers[header::X_CONTENT_TYPE_OPTIONS], NOSNIFF);
            assert_eq!(channel.content, None);
        }
    }

    #[test]
    fn test_vendor_headers_are_stripped_from_both_channels() {
        let mut response = channel_with_vendor_headers("{}");
        let mut error = channel_with_vendor_headers("{}");
        apply(&request_accepting(None), &mut response, &mut error);

        for channel in [&response, &error] {
            assert!(channel.headers.keys().all(|name| !name.as_str().starts_with("x-amz-")));
            assert_eq!(channel.headers["x-correlation-id"], "keep-me");
        }
    }

    #[test]
    fn test_json_content_is_compacted_preserving_key_order() {
        let mut response = Channel::new(HeaderMap::new(), Some("{\n  \"zeta\": 1,\n  \"alpha\": [1, 2]\n}".into()));
        let mut error = Channel::new(HeaderMap::new(), Some("{ \"message\" : \"boom\" }".into()));
        apply(&request_accepting(None), &mut response, &mut error);

        assert_eq!(response.content.as_deref(), Some(r#"{"zeta":1,"alpha":[1,2]}"#));
        assert_eq!(error.content.as_deref(), Some(r#"{"message":"boom"}"#));
    }

    #[test]
    fn test_invalid_json_is_left_untouched() {
        let mut response = Channel::new(HeaderMap::new(), Some("{ \"ok\": true }".into()));
        let mut error = Channel::new(HeaderMap::new(), Some("<html>Bad Gateway</html>".into()));
        apply(&request_accepting(None), &mut response, &mut error);

        assert_eq!(error.content.as_deref(), Some("<html>Bad Gateway</html>"));
        assert_eq!(response.content.as_deref(), Some(r#"{"ok":true}"#));
        assert_eq!(error.headers[header::CONTENT_TYPE], VENDOR_JSON_CONTENT_TYPE);
    }
}
