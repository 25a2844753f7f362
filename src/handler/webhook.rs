//! Webhook responder for `POST /api/webhook`
//!
//! The payload is validated as JSON and echoed back byte-for-byte in `data`.

use chrono::SecondsFormat;
use hyper::StatusCode;
use serde::Serialize;
use serde_json::value::RawValue;

use super::router::DispatchContext;
use crate::error::DispatchError;
use crate::http::{self, ResponseDescriptor};
use crate::logger;

pub const RECEIVED_MESSAGE: &str = "Webhook processed successfully";

#[derive(Debug, Serialize)]
pub struct WebhookReply<'a> {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub data: &'a RawValue,
}

pub fn respond(
    body: &[u8],
    ctx: &DispatchContext<'_>,
) -> Result<ResponseDescriptor, DispatchError> {
    let payload: Box<RawValue> =
        serde_json::from_slice(body).map_err(|_| DispatchError::MalformedInput {
            error: "Invalid webhook data",
        })?;

    if ctx.log_webhook_payloads {
        logger::log_webhook_received(payload.get());
    }

    let reply = WebhookReply {
        status: "received",
        message: RECEIVED_MESSAGE,
        timestamp: ctx.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
        data: &payload,
    };
    Ok(http::build_json_response(StatusCode::OK, &reply))
}
