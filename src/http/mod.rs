//! HTTP protocol layer module
//!
//! Request/response descriptors, CORS policy and response builders, decoupled from the
//! routing and chat logic.

pub mod cors;
pub mod descriptor;
pub mod response;

// Re-export commonly used types
pub use descriptor::{RequestDescriptor, ResponseDescriptor};
pub use response::{
    build_404_response, build_405_response, build_413_response, build_error_response,
    build_html_response, build_json_response, build_options_response, into_hyper,
};
