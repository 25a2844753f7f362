//! hyper adapter
//!
//! Entry point for HTTP request processing: reads the body under the configured size
//! limit, builds a [`RequestDescriptor`], dispatches it and writes the access log.

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::router::{self, DispatchContext};
use crate::config::AppState;
use crate::http::{self, cors, RequestDescriptor, ResponseDescriptor};
use crate::logger::{self, AccessLogEntry};

/// Outcome of reading a request body
enum BodyRead {
    Complete(Bytes),
    TooLarge,
    Failed,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let max_body_size = state.config.http.max_body_size;

    let mut descriptor = RequestDescriptor::new(parts.method.clone(), parts.uri.path());
    for (name, value) in &parts.headers {
        match value.to_str() {
            Ok(v) => descriptor = descriptor.with_header(name.as_str(), v),
            Err(_) => logger::log_warning(&format!("Header {name} contains non-ASCII characters")),
        }
    }

    let response = if exceeds_declared_length(&descriptor, max_body_size) {
        payload_too_large()
    } else {
        match read_body(body, max_body_size).await {
            BodyRead::Complete(bytes) => {
                if !bytes.is_empty() {
                    descriptor = descriptor.with_body(bytes);
                }
                router::dispatch(&descriptor, &DispatchContext::from_state(&state))
            }
            BodyRead::TooLarge => payload_too_large(),
            // unreadable bodies are dispatched as absent
            BodyRead::Failed => {
                router::dispatch(&descriptor, &DispatchContext::from_state(&state))
            }
        }
    };

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::for_request(peer_addr.ip().to_string(), &descriptor);
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status.as_u16();
        entry.body_bytes = response.body.len();
        entry.elapsed = started.elapsed();
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(http::into_hyper(response, &state.config.http.server_name))
}

/// Reject early when `Content-Length` already announces an oversized body
fn exceeds_declared_length(descriptor: &RequestDescriptor, max_body_size: u64) -> bool {
    let Some(declared) = descriptor.header("content-length") else {
        return false;
    };
    match declared.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            true
        }
        Ok(_) => false,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{declared}', skipping size check"
            ));
            false
        }
    }
}

async fn read_body<B>(body: B, max_body_size: u64) -> BodyRead
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => BodyRead::Complete(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            BodyRead::TooLarge
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            BodyRead::Failed
        }
    }
}

fn payload_too_large() -> ResponseDescriptor {
    let mut response = http::build_413_response();
    cors::apply_cors(&mut response);
    response
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
