use crate::http::{self, ResponseDescriptor};
use hyper::StatusCode;
use thiserror::Error;

/// Failures the dispatcher turns into error responses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Body is not valid JSON; carries the client-facing error text
    #[error("MalformedInput: {error}")]
    MalformedInput { error: &'static str },
    #[error("MissingRequiredField: {field}")]
    MissingRequiredField { field: &'static str },
    #[error("UnsupportedMethod: {method} {path}")]
    UnsupportedMethod { method: String, path: String },
    #[error("NotFound: {method} {path}")]
    NotFound { method: String, path: String },
}

impl DispatchError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedInput { .. } | Self::MissingRequiredField { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::UnsupportedMethod { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn into_response(self) -> ResponseDescriptor {
        let status = self.status();
        match self {
            Self::MalformedInput { error } => http::build_error_response(status, error),
            Self::MissingRequiredField { field } => {
                let error = match field {
                    "message" => "Message is required".to_string(),
                    other => format!("{other} is required"),
                };
                http::build_error_response(status, &error)
            }
            Self::UnsupportedMethod { .. } => http::build_405_response(
                "POST, OPTIONS",
                "GET method not supported. Use POST instead.",
                "Please use POST method to send chat messages",
            ),
            Self::NotFound { .. } => http::build_404_response(),
        }
    }
}
