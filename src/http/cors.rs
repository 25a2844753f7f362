//! CORS header policy
//!
//! Every response leaves the dispatcher with `Access-Control-Allow-Origin: *`;
//! preflight answers additionally carry the allowed methods and headers.

use super::descriptor::ResponseDescriptor;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const MAX_AGE_SECS: &str = "86400";

/// Attach the origin header carried by all responses
pub fn apply_cors(response: &mut ResponseDescriptor) {
    response.set_header("Access-Control-Allow-Origin", ALLOW_ORIGIN);
}

/// Attach the full preflight header set
pub fn apply_preflight(response: &mut ResponseDescriptor) {
    apply_cors(response);
    response.set_header("Access-Control-Allow-Methods", ALLOW_METHODS);
    response.set_header("Access-Control-Allow-Headers", ALLOW_HEADERS);
    response.set_header("Access-Control-Max-Age", MAX_AGE_SECS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_apply_cors_sets_origin_only() {
        let mut resp = ResponseDescriptor::new(StatusCode::NOT_FOUND);
        apply_cors(&mut resp);
        assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
        assert_eq!(resp.header("access-control-allow-methods"), None);
    }

    #[test]
    fn test_apply_preflight_sets_method_and_header_pair() {
        let mut resp = ResponseDescriptor::new(StatusCode::NO_CONTENT);
        apply_preflight(&mut resp);
        assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            resp.header("Access-Control-Allow-Methods"),
            Some("GET, POST, OPTIONS")
        );
        assert_eq!(
            resp.header("Access-Control-Allow-Headers"),
            Some("Content-Type, Authorization")
        );
    }

    #[test]
    fn test_apply_cors_is_idempotent() {
        let mut resp = ResponseDescriptor::new(StatusCode::OK);
        apply_cors(&mut resp);
        apply_cors(&mut resp);
        assert_eq!(resp.headers.len(), 1);
    }
}
