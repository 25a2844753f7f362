//! Host-independent request and response descriptors
//!
//! The dispatcher consumes a [`RequestDescriptor`] and produces a [`ResponseDescriptor`];
//! neither type knows about hyper's body streams.

use hyper::body::Bytes;
use hyper::{Method, StatusCode};
use std::collections::BTreeMap;

/// Normalized incoming request, built once per call
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    /// Header names are stored lower-cased
    pub headers: BTreeMap<String, String>,
    pub body: Option<Bytes>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Raw body bytes, empty when the request carried none
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Normalized outgoing response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ResponseDescriptor {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Insert or replace a header, matching existing names case-insensitively
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_string(), value.into());
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON
    #[cfg(test)]
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_header_lookup_is_case_insensitive() {
        let req = RequestDescriptor::new(Method::POST, "/api/chat")
            .with_header("Content-Type", "application/json");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn test_request_without_body_yields_empty_slice() {
        let req = RequestDescriptor::new(Method::POST, "/api/webhook");
        assert!(req.body_bytes().is_empty());

        let req = req.with_body("{}");
        assert_eq!(req.body_bytes(), b"{}");
    }

    #[test]
    fn test_set_header_replaces_existing_value() {
        let mut resp =
            ResponseDescriptor::new(StatusCode::OK).with_header("content-type", "text/plain");
        resp.set_header("Content-Type", "application/json");
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.header("content-type"), Some("application/json"));
    }
}
