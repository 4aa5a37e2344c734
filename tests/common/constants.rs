//! Shared constants for end-to-end tests

/// API key every test server is configured with
pub const TEST_API_KEY: &str = "e2e-test-api-key";

/// A key that never matches the configured one
#[allow(dead_code)]
pub const WRONG_API_KEY: &str = "not-the-api-key";

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
