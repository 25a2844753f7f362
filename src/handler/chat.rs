//! Mock chat responder for `POST /api/chat`
//!
//! No model is called: replies come from the intent table in [`super::intent`].

use chrono::{FixedOffset, Offset, SecondsFormat, Utc};
use hyper::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::intent::{self, ReplyContext};
use super::router::DispatchContext;
use crate::error::DispatchError;
use crate::http::{self, ResponseDescriptor};

/// Validated chat request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChatRequest {
    pub message: String,
    pub model: String,
}

/// Body of a successful chat response
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub model: String,
    pub timestamp: String,
    pub note: String,
}

/// Parse and validate a chat body
///
/// A non-string `message` counts as missing, a non-string `model` falls back to
/// `default_model`. `stream` and any other fields are ignored.
pub fn parse_chat_request(
    body: &[u8],
    default_model: &str,
) -> Result<ParsedChatRequest, DispatchError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| DispatchError::MalformedInput {
        error: "Invalid JSON",
    })?;

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .ok_or(DispatchError::MissingRequiredField { field: "message" })?;

    let model = value
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or(default_model);

    Ok(ParsedChatRequest {
        message: message.to_string(),
        model: model.to_string(),
    })
}

pub fn respond(
    body: &[u8],
    ctx: &DispatchContext<'_>,
) -> Result<ResponseDescriptor, DispatchError> {
    let request = parse_chat_request(body, &ctx.chat.default_model)?;
    let now = ctx.clock.now();
    let offset = FixedOffset::east_opt(ctx.chat.utc_offset_minutes.saturating_mul(60))
        .unwrap_or_else(|| Utc.fix());

    let message = intent::compose_reply(&ReplyContext {
        message: &request.message,
        model: &request.model,
        now: now.with_timezone(&offset),
    });

    let reply = ChatReply {
        message,
        model: request.model,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        note: ctx.chat.note.clone(),
    };
    Ok(http::build_json_response(StatusCode::OK, &reply))
}
