//! Shared-secret gate for the record routes.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::debug;

use super::super::{ApiError, ServerConfig};

/// Sent by clients as `X-API-Key`; header names are case-insensitive.
pub const API_KEY_HEADER: &str = "x-api-key";

fn api_key_matches(headers: &HeaderMap, expected: &str) -> bool {
    match headers.get(API_KEY_HEADER) {
        Some(provided) => provided.as_bytes().ct_eq(expected.as_bytes()).into(),
        None => false,
    }
}

/// Rejects the request with 401 before it reaches any handler unless it
/// carries the configured API key.
pub async fn require_api_key(
    State(config): State<ServerConfig>,
    request: Request,
    next: Next,
) -> Response {
    if !api_key_matches(request.headers(), &config.api_key) {
        debug!(
            "Rejected {} {}: invalid or missing API key",
            request.method(),
            request.uri().path()
        );
        return ApiError::Unauthorized.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    fn headers_with(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(key).unwrap());
        headers
    }

    #[test]
    fn matches_exact_key() {
        assert!(api_key_matches(&headers_with("s3cret"), "s3cret"));
    }

    #[test]
    fn rejects_missing_header() {
        assert!(!api_key_matches(&HeaderMap::new(), "s3cret"));
    }

    #[test]
    fn rejects_prefix_and_case_variants() {
        assert!(!api_key_matches(&headers_with("s3cre"), "s3cret"));
        assert!(!api_key_matches(&headers_with("s3cret2"), "s3cret"));
        assert!(!api_key_matches(&headers_with("S3CRET"), "s3cret"));
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"X-Api-KEY").unwrap(),
            HeaderValue::from_static("s3cret"),
        );
        assert!(api_key_matches(&headers, "s3cret"));
    }
}
