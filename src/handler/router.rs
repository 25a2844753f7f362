//! Request routing dispatch module
//!
//! Pure mapping from a [`RequestDescriptor`] to a [`ResponseDescriptor`]. The only
//! ambient input is the clock carried in [`DispatchContext`].

use hyper::Method;

use super::{chat, static_page, webhook};
use crate::clock::Clock;
use crate::config::{AppState, ChatConfig};
use crate::error::DispatchError;
use crate::http::{self, cors, RequestDescriptor, ResponseDescriptor};
use crate::logger;

pub const CHAT_PATH: &str = "/api/chat";
pub const WEBHOOK_PATH: &str = "/api/webhook";

/// Everything a dispatch may read besides the request itself
pub struct DispatchContext<'a> {
    pub clock: &'a dyn Clock,
    pub chat: &'a ChatConfig,
    pub log_webhook_payloads: bool,
}

impl<'a> DispatchContext<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            clock: state.clock.as_ref(),
            chat: &state.config.chat,
            log_webhook_payloads: state.config.logging.log_webhook_payloads,
        }
    }
}

/// Produce exactly one response for `request`; errors become error responses
pub fn dispatch(request: &RequestDescriptor, ctx: &DispatchContext<'_>) -> ResponseDescriptor {
    let mut response = route(request, ctx).unwrap_or_else(|err| {
        logger::log_debug(&err.to_string());
        err.into_response()
    });
    cors::apply_cors(&mut response);
    response
}

/// Routing table, first match wins
fn route(
    request: &RequestDescriptor,
    ctx: &DispatchContext<'_>,
) -> Result<ResponseDescriptor, DispatchError> {
    match (&request.method, request.path.as_str()) {
        (&Method::OPTIONS, _) => {
            let mut response = http::build_options_response();
            cors::apply_preflight(&mut response);
            Ok(response)
        }
        (&Method::GET, "/" | "/index.html") => {
            Ok(http::build_html_response(static_page::INDEX_HTML))
        }
        (&Method::POST, CHAT_PATH) => chat::respond(request.body_bytes(), ctx),
        (&Method::POST, WEBHOOK_PATH) => webhook::respond(request.body_bytes(), ctx),
        (&Method::GET, CHAT_PATH) => Err(DispatchError::UnsupportedMethod {
            method: request.method.to_string(),
            path: request.path.clone(),
        }),
        _ => Err(DispatchError::NotFound {
            method: request.method.to_string(),
            path: request.path.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::handler::intent;
    use chrono::{TimeZone, Utc};
    use hyper::StatusCode;

    struct Fixture {
        clock: FixedClock,
        chat: ChatConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                clock: FixedClock(Utc.with_ymd_and_hms(2024, 2, 15, 10, 0, 0).unwrap()),
                chat: ChatConfig::default(),
            }
        }

        fn send(&self, request: &RequestDescriptor) -> ResponseDescriptor {
            let ctx = DispatchContext {
                clock: &self.clock,
                chat: &self.chat,
                log_webhook_payloads: false,
            };
            dispatch(request, &ctx)
        }

        fn post(&self, path: &str, body: &str) -> ResponseDescriptor {
            self.send(&RequestDescriptor::new(Method::POST, path).with_body(body.to_string()))
        }

        fn get(&self, path: &str) -> ResponseDescriptor {
            self.send(&RequestDescriptor::new(Method::GET, path))
        }
    }

    fn assert_cors(resp: &ResponseDescriptor) {
        assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
    }

    #[test]
    fn test_options_preflight_on_any_path() {
        let fx = Fixture::new();
        for path in ["/", "/api/chat", "/api/webhook", "/anything/else"] {
            let resp = fx.send(&RequestDescriptor::new(Method::OPTIONS, path));
            assert_eq!(resp.status, StatusCode::NO_CONTENT);
            assert!(resp.body.is_empty());
            assert_cors(&resp);
            assert_eq!(
                resp.header("Access-Control-Allow-Methods"),
                Some("GET, POST, OPTIONS")
            );
            assert_eq!(
                resp.header("Access-Control-Allow-Headers"),
                Some("Content-Type, Authorization")
            );
            assert_eq!(resp.header("Access-Control-Max-Age"), Some("86400"));
        }
    }

    #[test]
    fn test_index_page() {
        let fx = Fixture::new();
        for path in ["/", "/index.html"] {
            let resp = fx.get(path);
            assert_eq!(resp.status, StatusCode::OK);
            assert!(resp.header("content-type").unwrap().starts_with("text/html"));
            assert!(resp.body.starts_with("<!DOCTYPE html>"));
            assert_cors(&resp);
        }
    }

    #[test]
    fn test_chat_greeting_scenario() {
        let fx = Fixture::new();
        let resp = fx.post(CHAT_PATH, r#"{"message":"xin chào","model":"gpt-5-nano"}"#);
        assert_eq!(resp.status, StatusCode::OK);
        assert_cors(&resp);
        let body = resp.json().unwrap();
        assert_eq!(body["message"], intent::GREETING_REPLY);
        assert_eq!(body["model"], "gpt-5-nano");
    }

    #[test]
    fn test_chat_echoes_requested_model() {
        let fx = Fixture::new();
        for model in ["gpt-5-nano", "gpt-5-mini", "gpt-4o", "custom-model"] {
            let body = serde_json::json!({ "message": "Hello from manual test!", "model": model });
            let resp = fx.post(CHAT_PATH, &body.to_string());
            assert_eq!(resp.status, StatusCode::OK);
            assert_eq!(resp.json().unwrap()["model"], model);
        }
    }

    #[test]
    fn test_chat_days_in_month_on_leap_february() {
        let fx = Fixture::new();
        let resp = fx.post(CHAT_PATH, r#"{"message":"how many days in this month"}"#);
        let body = resp.json().unwrap();
        assert_eq!(body["message"], "Tháng 2 có 29 ngày");
        assert_eq!(body["model"], "gpt-5-nano");
    }

    #[test]
    fn test_chat_missing_message() {
        let fx = Fixture::new();
        for body in [r"{}", r#"{"model":"gpt-4o"}"#, r#"{"message":""}"#] {
            let resp = fx.post(CHAT_PATH, body);
            assert_eq!(resp.status, StatusCode::BAD_REQUEST);
            assert_cors(&resp);
            assert_eq!(resp.json().unwrap()["error"], "Message is required");
        }
    }

    #[test]
    fn test_malformed_json_is_400_on_both_endpoints() {
        let fx = Fixture::new();
        let resp = fx.post(CHAT_PATH, "{not json");
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.json().unwrap()["error"], "Invalid JSON");
        assert_cors(&resp);

        let resp = fx.post(WEBHOOK_PATH, "{not json");
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.json().unwrap()["error"], "Invalid webhook data");
        assert_cors(&resp);
    }

    #[test]
    fn test_post_without_body_is_malformed() {
        let fx = Fixture::new();
        let resp = fx.send(&RequestDescriptor::new(Method::POST, CHAT_PATH));
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        let resp = fx.send(&RequestDescriptor::new(Method::POST, WEBHOOK_PATH));
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_webhook_round_trip() {
        let fx = Fixture::new();
        let resp = fx.post(WEBHOOK_PATH, r#"{"a":1}"#);
        assert_eq!(resp.status, StatusCode::OK);
        assert_cors(&resp);
        let body = resp.json().unwrap();
        assert_eq!(body["status"], "received");
        assert_eq!(body["data"], serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_get_chat_is_405() {
        let fx = Fixture::new();
        let resp = fx.get(CHAT_PATH);
        assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_cors(&resp);
        let body = resp.json().unwrap();
        assert!(body["error"].is_string());
        assert!(body["message"].is_string());
    }

    #[test]
    fn test_unmatched_routes_are_404() {
        let fx = Fixture::new();
        let cases = [
            (Method::GET, "/unknown"),
            (Method::GET, WEBHOOK_PATH),
            (Method::POST, "/"),
            (Method::PUT, CHAT_PATH),
            (Method::DELETE, "/index.html"),
            (Method::GET, "/api/chat/"),
        ];
        for (method, path) in cases {
            let resp = fx.send(&RequestDescriptor::new(method, path));
            assert_eq!(resp.status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(resp.body, "Not Found");
            assert_cors(&resp);
        }
    }

    #[test]
    fn test_dispatch_reads_state() {
        let config =
            crate::config::Config::from_toml("[chat]\ndefault_model = \"gpt-4o\"").unwrap();
        let state = AppState::with_clock(config, std::sync::Arc::new(Fixture::new().clock));
        let ctx = DispatchContext::from_state(&state);
        let resp = dispatch(
            &RequestDescriptor::new(Method::POST, CHAT_PATH).with_body(r#"{"message":"hi"}"#),
            &ctx,
        );
        assert_eq!(resp.json().unwrap()["model"], "gpt-4o");
    }
}
