//! HTTP response building module
//!
//! Builders for the status codes the router emits, plus the conversion from a
//! [`ResponseDescriptor`] into a hyper response.

use super::cors;
use super::descriptor::ResponseDescriptor;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use hyper::{Response, StatusCode};
use serde::Serialize;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// Build JSON response
///
/// Falls back to a 500 with a fixed body if `body` cannot be serialized.
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> ResponseDescriptor {
    match serde_json::to_string(body) {
        Ok(json) => ResponseDescriptor::new(status)
            .with_header("Content-Type", CONTENT_TYPE_JSON)
            .with_body(json),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            ResponseDescriptor::new(StatusCode::INTERNAL_SERVER_ERROR)
                .with_header("Content-Type", CONTENT_TYPE_JSON)
                .with_body(r#"{"error":"Internal server error"}"#)
        }
    }
}

/// Build `{"error": ...}` JSON response
pub fn build_error_response(status: StatusCode, error: &str) -> ResponseDescriptor {
    build_json_response(status, &serde_json::json!({ "error": error }))
}

/// Build generic HTML response
pub fn build_html_response(content: &str) -> ResponseDescriptor {
    ResponseDescriptor::new(StatusCode::OK)
        .with_header("Content-Type", CONTENT_TYPE_HTML)
        .with_body(content)
}

/// Build 404 Not Found response
pub fn build_404_response() -> ResponseDescriptor {
    ResponseDescriptor::new(StatusCode::NOT_FOUND)
        .with_header("Content-Type", CONTENT_TYPE_TEXT)
        .with_body("Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str, error: &str, message: &str) -> ResponseDescriptor {
    build_json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &serde_json::json!({ "error": error, "message": message }),
    )
    .with_header("Allow", allow)
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> ResponseDescriptor {
    build_error_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> ResponseDescriptor {
    ResponseDescriptor::new(StatusCode::NO_CONTENT)
}

/// Convert a descriptor into the hyper response sent on the wire
pub fn into_hyper(descriptor: ResponseDescriptor, server_name: &str) -> Response<Full<Bytes>> {
    let status = descriptor.status;
    let mut builder = Response::builder()
        .status(status)
        .header("Server", server_name);

    for (name, value) in &descriptor.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(descriptor.body)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback.headers_mut().insert(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(cors::ALLOW_ORIGIN),
            );
            fallback
        })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    logger::log_error(&format!(
        "Failed to build {} response: {error}",
        status.as_u16()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_is_json() {
        let resp = build_error_response(StatusCode::BAD_REQUEST, "Invalid JSON");
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.header("content-type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(resp.json().unwrap()["error"], "Invalid JSON");
    }

    #[test]
    fn test_405_carries_allow_and_message() {
        let resp = build_405_response("POST, OPTIONS", "use POST", "please use POST");
        assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.header("Allow"), Some("POST, OPTIONS"));
        let body = resp.json().unwrap();
        assert_eq!(body["error"], "use POST");
        assert_eq!(body["message"], "please use POST");
    }

    #[test]
    fn test_404_is_plain_text() {
        let resp = build_404_response();
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body, "Not Found");
        assert!(resp.json().is_none());
    }

    #[test]
    fn test_into_hyper_copies_status_headers_and_server() {
        let desc = build_html_response("<p>hi</p>").with_header("Access-Control-Allow-Origin", "*");
        let resp = into_hyper(desc, "edge-chat-router");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["server"], "edge-chat-router");
        assert_eq!(resp.headers()["content-type"], CONTENT_TYPE_HTML);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[test]
    fn test_into_hyper_rejects_invalid_header_value() {
        let desc = ResponseDescriptor::new(StatusCode::OK).with_header("X-Bad", "line\nbreak");
        let resp = into_hyper(desc, "edge-chat-router");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[test]
    fn test_into_hyper_fallback_keeps_cors_on_bad_server_name() {
        let mut desc = build_html_response("<p>hi</p>");
        cors::apply_cors(&mut desc);
        let resp = into_hyper(desc, "a\nb");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}
