mod api_key;
mod requests_logging;

pub use api_key::{require_api_key, API_KEY_HEADER};
pub use requests_logging::{log_requests, RequestsLoggingLevel};
